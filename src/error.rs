//! Unified error type for codec operations.

use thiserror::Error;

use crate::format::ImageFormat;

/// Unified error type for decode and encode operations.
///
/// The underlying codec crates signal failure through their own conventions;
/// every adapter normalizes them into this one taxonomy, so a top-level call
/// has exactly one failure channel.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// Format not recognized from magic bytes.
    #[error("unrecognized image format")]
    UnrecognizedFormat,

    /// Format declared but no codec available (not implemented or not
    /// compiled in).
    #[error("format {0:?} not supported (no codec available)")]
    UnsupportedFormat(ImageFormat),

    /// Format recognized but the requested operation or in-format variant
    /// is not supported.
    #[error("format {format:?} does not support: {detail}")]
    UnsupportedOperation {
        format: ImageFormat,
        detail: &'static str,
    },

    /// Input validation failed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Resource limit exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(&'static str),

    /// Pixel buffer allocation failure.
    #[error("out of memory")]
    Oom,

    /// File read or write failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying codec error (truncated or corrupt streams land here).
    #[error("codec error ({format:?}): {source}")]
    Codec {
        format: ImageFormat,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CodecError {
    /// Wrap a codec-specific error.
    pub fn from_codec<E>(format: ImageFormat, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CodecError::Codec {
            format,
            source: Box::new(error),
        }
    }
}
