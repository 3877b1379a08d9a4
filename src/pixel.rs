//! Typed pixel buffers and the alpha premultiplier.
//!
//! Uses `imgref::ImgVec` for 2D pixel data with typed pixels from the `rgb`
//! crate. Every decode path normalizes into one of the two [`PixelData`]
//! variants, so the variant itself carries the has-alpha /
//! bytes-per-pixel distinction.

pub use imgref::{ImgRef, ImgVec};
pub use rgb::{Rgb, Rgba};

use rgb::ComponentBytes;

use crate::error::CodecError;

/// Canonical decoded pixel data.
///
/// Width and height are embedded in the `ImgVec`. Buffers are always tightly
/// packed (stride == width).
pub enum PixelData {
    /// 8-bit RGB, 3 bytes per pixel.
    Rgb8(ImgVec<Rgb<u8>>),
    /// 8-bit RGBA, 4 bytes per pixel.
    Rgba8(ImgVec<Rgba<u8>>),
}

impl PixelData {
    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            PixelData::Rgb8(img) => img.width() as u32,
            PixelData::Rgba8(img) => img.width() as u32,
        }
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            PixelData::Rgb8(img) => img.height() as u32,
            PixelData::Rgba8(img) => img.height() as u32,
        }
    }

    /// Whether this pixel data carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self, PixelData::Rgba8(_))
    }

    /// Bytes occupied by one pixel (3 for RGB, 4 for RGBA).
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelData::Rgb8(_) => 3,
            PixelData::Rgba8(_) => 4,
        }
    }

    /// Raw pixel bytes in row-major order, exactly
    /// `width * height * bytes_per_pixel` long.
    pub fn bytes(&self) -> &[u8] {
        match self {
            PixelData::Rgb8(img) => img.buf().as_bytes(),
            PixelData::Rgba8(img) => img.buf().as_bytes(),
        }
    }

    /// Copy into an RGB buffer, discarding any alpha channel.
    ///
    /// Used by the encoders' RGB fallback path.
    pub fn to_rgb8(&self) -> ImgVec<Rgb<u8>> {
        match self {
            PixelData::Rgb8(img) => {
                let (buf, w, h) = img.as_ref().to_contiguous_buf();
                ImgVec::new(buf.into_owned(), w, h)
            }
            PixelData::Rgba8(img) => {
                let (buf, w, h) = img.as_ref().to_contiguous_buf();
                let rgb: Vec<Rgb<u8>> = buf
                    .iter()
                    .map(|p| Rgb {
                        r: p.r,
                        g: p.g,
                        b: p.b,
                    })
                    .collect();
                ImgVec::new(rgb, w, h)
            }
        }
    }
}

impl core::fmt::Debug for PixelData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let variant = match self {
            PixelData::Rgb8(_) => "Rgb8",
            PixelData::Rgba8(_) => "Rgba8",
        };
        write!(
            f,
            "PixelData::{}({}x{})",
            variant,
            self.width(),
            self.height()
        )
    }
}

/// Premultiply one pixel, packing the result with A in the top byte.
///
/// Each of R, G, B is scaled by `(a + 1) / 256` in integer arithmetic; the
/// `+1` bias keeps a fully opaque pixel bit-identical (`(v * 256) >> 8 == v`)
/// while staying a pure shift. The packed layout is little-endian RGBA:
/// `r' | g' << 8 | b' << 16 | a << 24`.
#[inline]
pub fn premultiply(r: u8, g: u8, b: u8, a: u8) -> u32 {
    let scale = a as u32 + 1;
    let pr = (r as u32 * scale) >> 8;
    let pg = (g as u32 * scale) >> 8;
    let pb = (b as u32 * scale) >> 8;
    pr | (pg << 8) | (pb << 16) | ((a as u32) << 24)
}

/// Apply [`premultiply`] to every pixel of a decoded RGBA buffer.
pub(crate) fn premultiply_in_place(pixels: &mut [Rgba<u8>]) {
    for px in pixels {
        let packed = premultiply(px.r, px.g, px.b, px.a);
        px.r = packed as u8;
        px.g = (packed >> 8) as u8;
        px.b = (packed >> 16) as u8;
        px.a = (packed >> 24) as u8;
    }
}

/// Allocate a filled pixel buffer, mapping allocation failure to
/// [`CodecError::Oom`] instead of aborting the process.
pub(crate) fn try_alloc<T: Clone>(len: usize, fill: T) -> Result<Vec<T>, CodecError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| CodecError::Oom)?;
    buf.resize(len, fill);
    Ok(buf)
}
