//! Burncap CLI
//!
//! Headless interface to the caption pipeline: register videos, run cloud
//! transcription, inspect and edit captions, export subtitle files, and burn
//! styled captions into video through FFmpeg.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use burncap_core::{
    detect_system_ffmpeg, serialize_segments, write_subtitle_file, CaptionStore, CaptionStyle,
    CloudTranscriber, Color, Exporter, FFmpegRunner, FilterStrategy, FontWeight, PollOutcome,
    RenderProgress, SubtitleFormat, TextCase, TranscriptionConfig, TranscriptionService,
    VerticalPosition, Video, DEFAULT_WORDS_PER_SEGMENT,
};

// =============================================================================
// Argument Types
// =============================================================================

#[derive(Parser)]
#[command(name = "burncap", version, about = "Caption transcription and burn-in export")]
struct Cli {
    /// Path to the caption database (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a video file in the caption database
    Add {
        /// Path to the video file
        file: PathBuf,
    },

    /// Show a video record and its processing status
    Status {
        /// Video id
        video_id: String,
    },

    /// Transcribe a registered video and store caption segments
    Transcribe {
        /// Video id
        video_id: String,

        /// Speech-to-text recognition endpoint URL
        #[arg(long)]
        endpoint: String,

        /// API key (falls back to the BURNCAP_API_KEY environment variable)
        #[arg(long)]
        api_key: Option<String>,

        /// Language code sent to the recognizer
        #[arg(long, default_value = "en-US")]
        language: String,

        /// Words per caption segment
        #[arg(long, default_value_t = DEFAULT_WORDS_PER_SEGMENT)]
        words_per_segment: usize,

        /// Maximum seconds to wait for the run to finish
        #[arg(long, default_value_t = 600)]
        timeout_secs: u64,
    },

    /// List a video's caption segments as JSON
    Captions {
        /// Video id
        video_id: String,
    },

    /// Update the text of a single caption segment
    Edit {
        /// Caption segment id
        caption_id: String,

        /// Replacement text
        text: String,
    },

    /// Write a subtitle file (SRT or VTT) for a video
    Export {
        /// Video id
        video_id: String,

        /// Subtitle format: srt or vtt
        #[arg(long, default_value = "srt", value_parser = parse_format)]
        format: SubtitleFormat,

        /// Output directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Case transform: none, uppercase, or lowercase
        #[arg(long, default_value = "none", value_parser = parse_case)]
        case: TextCase,

        /// Print the subtitle text to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Burn styled captions into a video with FFmpeg
    Burn {
        /// Video id
        video_id: String,

        /// Output video path
        #[arg(long)]
        output: PathBuf,

        /// Filter strategy: subtitle_file or drawtext
        #[arg(long, default_value = "subtitle_file", value_parser = parse_strategy)]
        strategy: FilterStrategy,

        /// Working directory for intermediate subtitle files
        #[arg(long)]
        work_dir: Option<PathBuf>,

        #[command(flatten)]
        style: StyleArgs,
    },
}

/// Caption style flags shared by the burn command
#[derive(Args)]
struct StyleArgs {
    /// Font family name
    #[arg(long, default_value = "Arial")]
    font: String,

    /// Font size in points
    #[arg(long, default_value_t = 48)]
    font_size: u32,

    /// Use a bold font weight
    #[arg(long)]
    bold: bool,

    /// Text fill color as 6-digit hex (e.g. FFFFFF)
    #[arg(long, default_value = "FFFFFF", value_parser = parse_color)]
    color: Color,

    /// Outline color as 6-digit hex
    #[arg(long, default_value = "000000", value_parser = parse_color)]
    outline_color: Color,

    /// Outline width in pixels
    #[arg(long, default_value_t = 2.0)]
    outline_width: f32,

    /// Draw a background box behind the text
    #[arg(long)]
    background: bool,

    /// Background box color as 6-digit hex
    #[arg(long, value_parser = parse_color)]
    background_color: Option<Color>,

    /// Line spacing in pixels
    #[arg(long, default_value_t = 0.0)]
    line_spacing: f32,

    /// Vertical position: bottom, top, or center
    #[arg(long, default_value = "bottom", value_parser = parse_position)]
    position: VerticalPosition,

    /// Case transform: none, uppercase, or lowercase
    #[arg(long, default_value = "none", value_parser = parse_case)]
    case: TextCase,
}

impl StyleArgs {
    fn into_style(self) -> CaptionStyle {
        let defaults = CaptionStyle::default();
        CaptionStyle {
            font_family: self.font,
            font_size: self.font_size,
            font_weight: if self.bold {
                FontWeight::Bold
            } else {
                FontWeight::Normal
            },
            color: self.color,
            outline_color: self.outline_color,
            outline_width: self.outline_width,
            background: self.background,
            background_color: self.background_color.unwrap_or(defaults.background_color),
            line_spacing: self.line_spacing,
            position: self.position,
            text_case: self.case,
        }
    }
}

// =============================================================================
// Value Parsers
// =============================================================================

fn parse_format(s: &str) -> std::result::Result<SubtitleFormat, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_strategy(s: &str) -> std::result::Result<FilterStrategy, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_case(s: &str) -> std::result::Result<TextCase, String> {
    match s.to_lowercase().as_str() {
        "none" => Ok(TextCase::None),
        "uppercase" | "upper" => Ok(TextCase::Uppercase),
        "lowercase" | "lower" => Ok(TextCase::Lowercase),
        _ => Err(format!("Unknown text case: {}", s)),
    }
}

fn parse_position(s: &str) -> std::result::Result<VerticalPosition, String> {
    match s.to_lowercase().as_str() {
        "bottom" => Ok(VerticalPosition::Bottom),
        "top" => Ok(VerticalPosition::Top),
        "center" => Ok(VerticalPosition::Center),
        _ => Err(format!("Unknown position: {}", s)),
    }
}

fn parse_color(s: &str) -> std::result::Result<Color, String> {
    Color::from_hex(s).ok_or_else(|| format!("Invalid hex color: {}", s))
}

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = Arc::new(open_store(cli.db)?);

    match cli.command {
        Command::Add { file } => cmd_add(&store, &file),
        Command::Status { video_id } => cmd_status(&store, &video_id),
        Command::Transcribe {
            video_id,
            endpoint,
            api_key,
            language,
            words_per_segment,
            timeout_secs,
        } => {
            cmd_transcribe(
                store,
                &video_id,
                &endpoint,
                api_key,
                language,
                words_per_segment,
                timeout_secs,
            )
            .await
        }
        Command::Captions { video_id } => cmd_captions(&store, &video_id),
        Command::Edit { caption_id, text } => {
            store.update_caption_text(&caption_id, &text)?;
            println!("updated {}", caption_id);
            Ok(())
        }
        Command::Export {
            video_id,
            format,
            dir,
            case,
            stdout,
        } => cmd_export(&store, &video_id, format, &dir, case, stdout),
        Command::Burn {
            video_id,
            output,
            strategy,
            work_dir,
            style,
        } => cmd_burn(store, &video_id, &output, strategy, work_dir, style.into_style()).await,
    }
}

fn open_store(db: Option<PathBuf>) -> Result<CaptionStore> {
    let path = match db {
        Some(path) => path,
        None => {
            let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            let dir = base.join("burncap");
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            dir.join("burncap.db")
        }
    };
    Ok(CaptionStore::create(&path)?)
}

// =============================================================================
// Commands
// =============================================================================

fn cmd_add(store: &CaptionStore, file: &PathBuf) -> Result<()> {
    let meta = std::fs::metadata(file)
        .with_context(|| format!("Cannot read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "video".to_string());
    let path = file
        .canonicalize()
        .unwrap_or_else(|_| file.clone())
        .to_string_lossy()
        .to_string();

    let video = Video::new(&filename, &path, meta.len());
    store.insert_video(&video)?;

    println!("{}", serde_json::to_string_pretty(&video)?);
    Ok(())
}

fn cmd_status(store: &CaptionStore, video_id: &str) -> Result<()> {
    let video = store.get_video(&video_id.to_string())?;
    println!("{}", serde_json::to_string_pretty(&video)?);
    Ok(())
}

async fn cmd_transcribe(
    store: Arc<CaptionStore>,
    video_id: &str,
    endpoint: &str,
    api_key: Option<String>,
    language: String,
    words_per_segment: usize,
    timeout_secs: u64,
) -> Result<()> {
    let api_key = match api_key.or_else(|| std::env::var("BURNCAP_API_KEY").ok()) {
        Some(key) => key,
        None => bail!("No API key: pass --api-key or set BURNCAP_API_KEY"),
    };

    let transcriber = Arc::new(CloudTranscriber::new(endpoint, &api_key)?);
    let service = TranscriptionService::new(Arc::clone(&store), transcriber);

    let config = TranscriptionConfig {
        language,
        word_time_offsets: true,
    };
    let id = video_id.to_string();
    service.start_transcription(&id, config, words_per_segment)?;

    let outcome = service
        .wait_for_status(
            &id,
            Duration::from_secs(timeout_secs),
            Duration::from_millis(500),
        )
        .await?;

    match outcome {
        PollOutcome::Completed => {
            let segments = store.captions_for_video(&id)?;
            println!("transcribed {} segments", segments.len());
            Ok(())
        }
        PollOutcome::Failed => bail!("Transcription failed; see logs for details"),
        PollOutcome::TimedOut => bail!("Timed out after {}s; the run may still finish", timeout_secs),
    }
}

fn cmd_captions(store: &CaptionStore, video_id: &str) -> Result<()> {
    let segments = store.captions_for_video(&video_id.to_string())?;
    println!("{}", serde_json::to_string_pretty(&segments)?);
    Ok(())
}

fn cmd_export(
    store: &CaptionStore,
    video_id: &str,
    format: SubtitleFormat,
    dir: &PathBuf,
    case: TextCase,
    stdout: bool,
) -> Result<()> {
    let id = video_id.to_string();
    let segments = store.captions_for_video(&id)?;

    if stdout {
        let text = serialize_segments(&id, &segments, format, case)?;
        print!("{}", text);
        return Ok(());
    }

    let path = write_subtitle_file(dir, &id, &segments, format, case)?;
    println!("wrote {}", path.display());
    Ok(())
}

async fn cmd_burn(
    store: Arc<CaptionStore>,
    video_id: &str,
    output: &PathBuf,
    strategy: FilterStrategy,
    work_dir: Option<PathBuf>,
    style: CaptionStyle,
) -> Result<()> {
    let info = detect_system_ffmpeg()?;
    tracing::debug!(version = %info.version, "using system FFmpeg");

    let renderer = Arc::new(FFmpegRunner::new(info));
    let work_dir = work_dir.unwrap_or_else(std::env::temp_dir);
    let exporter = Exporter::new(store, renderer, work_dir);

    let (tx, mut rx) = tokio::sync::mpsc::channel::<RenderProgress>(32);
    let progress_task = tokio::spawn(async move {
        while let Some(p) = rx.recv().await {
            eprint!("\rrendering: {:5.1}% (frame {}, {:.0} fps)", p.percent, p.frame, p.fps);
        }
        eprintln!();
    });

    let result = exporter
        .export(&video_id.to_string(), &style, strategy, output, Some(tx))
        .await;
    let _ = progress_task.await;

    let path = result?;
    println!("wrote {}", path.display());
    Ok(())
}
