//! Core error types for jscrunch

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CrunchError {
    /// Lexical or grammar violation in the script text
    #[error("{source_name}:{line}: {message}")]
    Syntax {
        source_name: String,
        line: u32,
        message: String,
    },

    /// The requested dialect has no matching grammar
    #[error("Unsupported JavaScript version: {0}")]
    UnsupportedVersion(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CrunchError {
    pub fn syntax(source_name: impl Into<String>, line: u32, message: impl Into<String>) -> Self {
        CrunchError::Syntax {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CrunchError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures raised while tokenizing or parsing script text.
    pub fn is_syntax(&self) -> bool {
        matches!(self, CrunchError::Syntax { .. })
    }
}

pub type Result<T> = std::result::Result<T, CrunchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_display() {
        let err = CrunchError::syntax("app.js", 12, "missing ; before statement");
        assert_eq!(err.to_string(), "app.js:12: missing ; before statement");
        assert!(err.is_syntax());
    }

    #[test]
    fn test_io_is_not_syntax() {
        let err = CrunchError::io(
            "/does/not/exist.js",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(!err.is_syntax());
        assert!(err.to_string().contains("/does/not/exist.js"));
    }
}
