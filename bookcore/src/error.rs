use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the bookcore library.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog file is missing, unreadable, or yields no usable rows.
    /// Terminal for the instance being constructed: callers should mark the
    /// feature unavailable rather than retry per request.
    #[error("failed to load catalog {path:?}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    /// A caller-supplied argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A model artifact is missing, corrupt, or has an unsupported version.
    #[error("artifact error: {0}")]
    Artifact(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Encode(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn data_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::DataLoad { path: path.into(), reason: reason.into() }
    }
}
