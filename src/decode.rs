//! Image decoding: the canonical container, format dispatch, and the raw
//! RGBA adopter.

use std::fs;
use std::path::Path;

use imgref::ImgVec;
use rgb::Rgba;

use crate::pixel::PixelData;
use crate::{CodecError, ImageFormat, Limits};

/// A decoded image in canonical form.
///
/// Every decode path lands here: 8-bit-per-channel pixels, RGB or RGBA, with
/// the alpha-premultiplication state tracked explicitly. The pixel buffer is
/// exclusively owned and exactly `width * height * bytes_per_pixel` long.
/// A premultiplied image always carries an alpha channel.
#[derive(Debug)]
pub struct DecodedImage {
    pixels: PixelData,
    bits_per_component: u8,
    premultiplied: bool,
}

impl DecodedImage {
    /// Internal constructor used by the codec adapters (depth is always 8
    /// after normalization).
    pub(crate) fn from_parts(pixels: PixelData, premultiplied: bool) -> Self {
        debug_assert!(!premultiplied || pixels.has_alpha());
        Self {
            pixels,
            bits_per_component: 8,
            premultiplied,
        }
    }

    /// Adopt caller-supplied RGBA8888 pixel data without decompression.
    ///
    /// `data` must be exactly `width * height * 4` bytes; a mismatch is
    /// rejected rather than trusted. The premultiplied flag is taken at the
    /// caller's word. The adopted image always has an alpha channel.
    pub fn from_raw(
        data: &[u8],
        width: u32,
        height: u32,
        bits_per_component: u8,
        premultiplied: bool,
    ) -> Result<Self, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidInput(
                "raw image dimensions must be non-zero".into(),
            ));
        }

        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| CodecError::InvalidInput("raw image dimensions overflow".into()))?;
        let expected = count
            .checked_mul(4)
            .ok_or_else(|| CodecError::InvalidInput("raw image dimensions overflow".into()))?;
        if data.len() != expected {
            return Err(CodecError::InvalidInput(format!(
                "raw buffer is {} bytes, expected {} for {}x{} RGBA8888",
                data.len(),
                expected,
                width,
                height
            )));
        }

        let mut pixels: Vec<Rgba<u8>> = Vec::new();
        pixels.try_reserve_exact(count).map_err(|_| CodecError::Oom)?;
        pixels.extend_from_slice(bytemuck::cast_slice(data));

        Ok(Self {
            pixels: PixelData::Rgba8(ImgVec::new(pixels, width as usize, height as usize)),
            bits_per_component,
            premultiplied,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether the pixel buffer carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.pixels.has_alpha()
    }

    /// Whether the color channels are premultiplied by alpha.
    pub fn is_premultiplied(&self) -> bool {
        self.premultiplied
    }

    /// Bits per color component (8 for every decoded image).
    pub fn bits_per_component(&self) -> u8 {
        self.bits_per_component
    }

    /// The canonical pixel buffer.
    pub fn pixels(&self) -> &PixelData {
        &self.pixels
    }

    /// Encode and write this image to `path`, with the encoder chosen by the
    /// `.png`/`.jpg` extension. See [`save_to_file`](crate::save_to_file).
    pub fn save_to_file(&self, path: impl AsRef<Path>, rgb_fallback: bool) -> Result<(), CodecError> {
        crate::encode::save_to_file(self, path, rgb_fallback)
    }
}

/// Image decode request builder.
///
/// # Example
///
/// ```no_run
/// use blitcodecs::DecodeRequest;
///
/// let data: &[u8] = &[]; // your image bytes
/// let image = DecodeRequest::new(data).decode()?;
/// println!("{}x{}", image.width(), image.height());
/// # Ok::<(), blitcodecs::CodecError>(())
/// ```
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    format: Option<ImageFormat>,
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    /// Create a new decode request.
    ///
    /// Without an explicit format, magic bytes decide the codec.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            format: None,
            limits: None,
        }
    }

    /// Override format auto-detection.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set resource limits.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode the image into canonical pixels.
    pub fn decode(self) -> Result<DecodedImage, CodecError> {
        if self.data.is_empty() {
            return Err(CodecError::InvalidInput("empty input buffer".into()));
        }

        let format = match self.format {
            Some(f) => f,
            None => ImageFormat::detect(self.data).ok_or(CodecError::UnrecognizedFormat)?,
        };
        log::debug!("decoding {} byte buffer as {:?}", self.data.len(), format);

        self.decode_format(format)
    }

    /// Dispatch to the format-specific codec.
    fn decode_format(self, format: ImageFormat) -> Result<DecodedImage, CodecError> {
        match format {
            #[cfg(feature = "png")]
            ImageFormat::Png => crate::codecs::png::decode(self.data, self.limits),
            #[cfg(not(feature = "png"))]
            ImageFormat::Png => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "jpeg")]
            ImageFormat::Jpeg => crate::codecs::jpeg::decode(self.data, self.limits),
            #[cfg(not(feature = "jpeg"))]
            ImageFormat::Jpeg => Err(CodecError::UnsupportedFormat(format)),

            #[cfg(feature = "tiff")]
            ImageFormat::Tiff => crate::codecs::tiff::decode(self.data, self.limits),
            #[cfg(not(feature = "tiff"))]
            ImageFormat::Tiff => Err(CodecError::UnsupportedFormat(format)),

            // Declared format, no codec in this crate.
            ImageFormat::WebP => Err(CodecError::UnsupportedFormat(format)),

            ImageFormat::Raw => Err(CodecError::InvalidInput(
                "raw data carries no dimensions; use DecodedImage::from_raw".into(),
            )),
        }
    }
}

/// Read a file and decode it with format auto-detection.
///
/// Each call owns its buffer and its output, so concurrent calls on
/// independent files need no coordination.
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedImage, CodecError> {
    let data = fs::read(path)?;
    DecodeRequest::new(&data).decode()
}
