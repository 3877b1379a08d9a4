//! # blitcodecs
//!
//! Unified image decode abstraction over PNG, JPEG, and TIFF, plus raw RGBA
//! adoption, normalizing every source into one canonical 8-bit pixel buffer
//! with explicit alpha and premultiplication metadata. PNG and JPEG are also
//! encode targets, with file output dispatched on the save path's extension.
//!
//! Each codec is feature-gated and all are on by default:
//!
//! ```toml
//! [dependencies]
//! blitcodecs = { version = "0.1", features = ["png", "jpeg", "tiff"] }
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use blitcodecs::DecodeRequest;
//!
//! let data = std::fs::read("sprite.png")?;
//! let image = DecodeRequest::new(&data).decode()?;
//! println!(
//!     "{}x{} alpha={} premultiplied={}",
//!     image.width(),
//!     image.height(),
//!     image.has_alpha(),
//!     image.is_premultiplied()
//! );
//! image.save_to_file("sprite-flat.jpg", false)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Decoded 4-channel pixels are premultiplied: PNG output runs through the
//! [`premultiply`] transform during decode, and TIFF output is premultiplied
//! by contract. JPEG and plain-RGB PNG decode to 3-byte RGB.

#![forbid(unsafe_code)]

mod codecs;
mod decode;
mod encode;
mod error;
mod format;
mod limits;
pub mod pixel;
mod source;

pub use decode::{DecodeRequest, DecodedImage, decode_file};
pub use encode::{EncodeOutput, EncodeRequest, save_to_file};
pub use error::CodecError;
pub use format::ImageFormat;
pub use limits::Limits;
pub use pixel::{PixelData, premultiply};
