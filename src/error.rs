use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, editing, or compositing the image stack
#[derive(Debug, Error)]
pub enum StackError {
    /// The file selection was empty
    #[error("no files were selected")]
    InvalidInput,

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("index {index} is out of range for a stack of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A background task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(String),

    #[error("invalid editor config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StackError>;
