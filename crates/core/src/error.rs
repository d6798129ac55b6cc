//! Error types reported by the engine.
//!
//! The engine never panics on full registries or corrupted level data. Those
//! conditions surface here and the caller picks the policy (drop, evict, abort).

use thiserror::Error;

/// Which fixed-capacity registry rejected an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Transitional,
    Mobile,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Transitional => "transitional",
            ListKind::Mobile => "mobile",
        }
    }
}

/// A registry is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{} object list is full ({capacity} entries)", list.as_str())]
pub struct ListFull {
    pub list: ListKind,
    pub capacity: usize,
}

/// Level data that cannot be used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("blueprint must be {expected} bytes, got {actual}")]
    WrongSize { expected: usize, actual: usize },

    #[error("link chain starting at entry {start} has no terminal entry after {steps} steps")]
    CorruptLinkChain { start: u8, steps: usize },

    #[error("link table index {index} is outside the table")]
    LinkOutOfRange { index: usize },
}

/// Anything a trigger can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    ListFull(#[from] ListFull),

    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_full_message_names_the_list() {
        let err = ListFull {
            list: ListKind::Mobile,
            capacity: 15,
        };
        assert_eq!(err.to_string(), "mobile object list is full (15 entries)");
    }

    #[test]
    fn engine_error_wraps_level_error() {
        let err: EngineError = LevelError::CorruptLinkChain { start: 4, steps: 256 }.into();
        assert!(matches!(err, EngineError::Level(_)));
        assert!(err.to_string().contains("entry 4"));
    }
}
