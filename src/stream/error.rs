//! Error types for bounded stream operations

use thiserror::Error;

/// Errors that can occur when constructing or reading a bounded stream
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Range out of bounds (offset={offset} length={length} source length={total})")]
    Range { offset: u64, length: u64, total: u64 },

    #[error("Not supported: {0}")]
    Unsupported(&'static str),

    #[error("Buffer slice out of bounds (offset={offset} len={len} capacity={capacity})")]
    BufferBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the stream module
pub type Result<T> = std::result::Result<T, StreamError>;

impl From<StreamError> for std::io::Error {
    fn from(err: StreamError) -> Self {
        use std::io::ErrorKind;

        match err {
            StreamError::Io(e) => e,
            StreamError::Unsupported(_) => std::io::Error::new(ErrorKind::Unsupported, err),
            other => std::io::Error::new(ErrorKind::InvalidInput, other),
        }
    }
}
