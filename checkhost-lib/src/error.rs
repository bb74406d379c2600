//! Error handling for report rendering and workspace cleanup.
//!
//! This module defines the error type shared by the renderer, the reset
//! coordinator and the configuration layer.

use std::fmt;

/// Main error type for checkhost operations.
///
/// Rendering failures are fatal to a single render call. Cleanup failures on
/// individual files are logged by the coordinator and never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckhostError {
    /// Row length does not match the number of column widths
    SizeMismatch {
        inputed: usize,
        size: usize,
    },

    /// A header spec declared the same column twice
    DuplicateColumn {
        name: String,
    },

    /// File I/O errors when writing reports or reading inputs
    FileError {
        path: String,
        message: String,
    },

    /// Configuration errors (invalid settings, unreadable TOML, etc.)
    ConfigError {
        message: String,
    },

    /// Malformed result input
    ParseError {
        message: String,
    },

    /// Generic internal errors that don't fit other categories
    Internal {
        message: String,
    },
}

impl CheckhostError {
    /// Create a new size mismatch error.
    pub fn size_mismatch(inputed: usize, size: usize) -> Self {
        Self::SizeMismatch { inputed, size }
    }

    /// Create a new duplicate column error.
    pub fn duplicate_column<N: Into<String>>(name: N) -> Self {
        Self::DuplicateColumn { name: name.into() }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error aborts only the current render call.
    pub fn is_render_error(&self) -> bool {
        matches!(self, Self::SizeMismatch { .. } | Self::DuplicateColumn { .. })
    }
}

impl fmt::Display for CheckhostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { inputed, size } => {
                write!(
                    f,
                    "Row and column widths differ in length (Inputed: {}; Size: {})",
                    inputed, size
                )
            }
            Self::DuplicateColumn { name } => {
                write!(f, "Duplicate column '{}' in header spec", name)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::ParseError { message } => {
                write!(f, "Parse error: {}", message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for CheckhostError {}

impl From<serde_json::Error> for CheckhostError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
        }
    }
}

impl From<std::io::Error> for CheckhostError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<walkdir::Error> for CheckhostError {
    fn from(err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::FileError {
            path,
            message: format!("Directory traversal failed: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_reports_both_lengths() {
        let err = CheckhostError::size_mismatch(5, 6);
        assert!(err.to_string().contains("Inputed: 5; Size: 6"));
        assert!(err.is_render_error());
    }

    #[test]
    fn test_file_error_display() {
        let err = CheckhostError::file_error("/tmp/out.txt", "Permission denied");
        assert_eq!(
            err.to_string(),
            "File error at '/tmp/out.txt': Permission denied"
        );
        assert!(!err.is_render_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: CheckhostError = io.into();
        assert!(matches!(err, CheckhostError::Internal { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: CheckhostError = json.into();
        match &err {
            CheckhostError::ParseError { message } => {
                assert!(message.starts_with("JSON parsing failed: "))
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().starts_with("Parse error: JSON parsing failed"));
    }
}
