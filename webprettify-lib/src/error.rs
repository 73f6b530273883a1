//! Error types for the prettifier.
//!
//! The CSS pipeline itself never fails; errors come from the HTML parser
//! boundary and from the file layer.

use std::path::PathBuf;

/// Result type alias for prettifier operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTML input could not be turned into a document.
    #[error("HTML parse failure: {message}")]
    Parse { message: String },

    /// Reading or writing a file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking a directory failed.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The file extension is not one the prettifier handles.
    #[error("unsupported file type: '{path}'")]
    UnsupportedFile { path: PathBuf },
}

impl Error {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an unsupported-file error.
    pub fn unsupported(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFile { path: path.into() }
    }

    /// True for the HTML parse failure kind.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
