use thiserror::Error;

/// Errors produced by payload decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid encoding at offset {position}: {reason}")]
    InvalidEncoding { position: usize, reason: String },
}

pub type CodecResult<T> = Result<T, CodecError>;
