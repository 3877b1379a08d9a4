//! Codec adapters for format-specific implementations.
//!
//! Each module is a thin adapter between the unified API and a codec crate,
//! normalizing that crate's error convention and pixel layout into
//! [`CodecError`](crate::CodecError) and [`PixelData`](crate::PixelData).

#[cfg(feature = "png")]
pub(crate) mod png;

#[cfg(feature = "jpeg")]
pub(crate) mod jpeg;

#[cfg(feature = "tiff")]
pub(crate) mod tiff;
