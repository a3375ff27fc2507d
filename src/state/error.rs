use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised by the store and the two flows.
///
/// `InvalidInput` is recoverable on the spot (bad drop, missing caption);
/// everything else is a filesystem problem that gets shown to the user and
/// not retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("caption record is unreadable: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Wrap an io error with the path it happened on
    pub fn io(action: &str, path: &Path, source: io::Error) -> Self {
        Error::Io {
            context: format!("failed to {} {}", action, path.display()),
            source,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
