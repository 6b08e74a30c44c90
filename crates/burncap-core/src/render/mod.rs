//! Render Module
//!
//! Style-to-filter compilation and burn-in export orchestration.

mod export;
mod filters;

pub use export::{Exporter, ExportStage};
pub use filters::{
    build_ass_document, build_drawtext_chain, compile_style, subtitle_file_filter, CompiledFilter,
    FilterStrategy,
};
