//! Global error handling for rbxplugin
//!
//! This module provides a centralized error type for every fatal condition
//! of a build. Per-entry problems never reach it: the walker skips them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for build operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A directory listing could not be read
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// XML processing errors
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Content holds a character the model format cannot carry
    #[error("Invalid character {ch:?} at byte {position}")]
    InvalidCharacter { ch: char, position: usize },

    /// The input path is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Specialized Result type for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Creates a BuildError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::BuildError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Allow converting BuildError to io::Error for the binary's entry point
impl From<BuildError> for io::Error {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::Io(err) => err,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(value: usize) -> Result<usize> {
        crate::ensure!(value > 2, Config, "value {} too small", value);
        Ok(value)
    }

    #[test]
    fn ensure_formats_message() {
        assert_eq!(check(3).unwrap(), 3);
        let err = check(1).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: value 1 too small");
    }

    #[test]
    fn invalid_character_message() {
        let err = BuildError::InvalidCharacter {
            ch: '\u{1}',
            position: 7,
        };
        assert_eq!(err.to_string(), "Invalid character '\\u{1}' at byte 7");
    }

    #[test]
    fn io_errors_pass_through() {
        let err: io::Error = BuildError::Io(io::Error::new(io::ErrorKind::NotFound, "gone")).into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
