//! Burncap Core Type Definitions
//!
//! Defines fundamental types used throughout the project.

/// Video unique identifier (ULID)
pub type VideoId = String;

/// Caption segment unique identifier (ULID)
pub type CaptionId = String;

/// Time in seconds (floating point)
pub type TimeSec = f64;

/// Generates a new ULID string for use as an entity identifier.
pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 26);
    }
}
