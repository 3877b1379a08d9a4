//! Image encoding and extension-dispatched file saving.

use std::fs;
use std::path::Path;

use crate::pixel::PixelData;
use crate::{CodecError, DecodedImage, ImageFormat};

/// Encoded image output.
#[derive(Clone, Debug)]
pub struct EncodeOutput {
    /// Encoded image data.
    pub data: Vec<u8>,
    /// Format used for encoding.
    pub format: ImageFormat,
}

/// Image encode request builder.
///
/// Only PNG and JPEG are encode targets. JPEG always emits 3-component RGB;
/// PNG keeps the alpha channel unless the RGB fallback is requested, in
/// which case alpha is stripped into a temporary 3-byte-per-pixel buffer
/// before encoding.
///
/// # Example
///
/// ```no_run
/// use blitcodecs::{DecodedImage, EncodeRequest, ImageFormat};
///
/// let image = DecodedImage::from_raw(&[0, 0, 0, 255], 1, 1, 8, false)?;
/// let output = EncodeRequest::new(ImageFormat::Jpeg)
///     .with_quality(90)
///     .encode(&image)?;
/// # Ok::<(), blitcodecs::CodecError>(())
/// ```
pub struct EncodeRequest {
    format: ImageFormat,
    quality: Option<u8>,
    rgb_fallback: bool,
}

impl EncodeRequest {
    /// Encode to a specific format.
    pub fn new(format: ImageFormat) -> Self {
        Self {
            format,
            quality: None,
            rgb_fallback: false,
        }
    }

    /// Set JPEG quality (0-100). Ignored by PNG.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality.min(100));
        self
    }

    /// Drop the alpha channel and encode plain RGB even when the source
    /// carries alpha.
    pub fn with_rgb_fallback(mut self, rgb_fallback: bool) -> Self {
        self.rgb_fallback = rgb_fallback;
        self
    }

    /// Encode the image.
    pub fn encode(self, image: &DecodedImage) -> Result<EncodeOutput, CodecError> {
        match self.format {
            #[cfg(feature = "png")]
            ImageFormat::Png => {
                let data = match image.pixels() {
                    PixelData::Rgba8(img) if !self.rgb_fallback => {
                        crate::codecs::png::encode_rgba8(img.as_ref())?
                    }
                    PixelData::Rgba8(_) => {
                        let rgb = image.pixels().to_rgb8();
                        crate::codecs::png::encode_rgb8(rgb.as_ref())?
                    }
                    PixelData::Rgb8(img) => crate::codecs::png::encode_rgb8(img.as_ref())?,
                };
                Ok(EncodeOutput {
                    data,
                    format: ImageFormat::Png,
                })
            }
            #[cfg(not(feature = "png"))]
            ImageFormat::Png => Err(CodecError::UnsupportedFormat(self.format)),

            #[cfg(feature = "jpeg")]
            ImageFormat::Jpeg => {
                let quality = self.quality.unwrap_or(crate::codecs::jpeg::DEFAULT_QUALITY);
                let data = match image.pixels() {
                    PixelData::Rgb8(img) => {
                        crate::codecs::jpeg::encode_rgb8(img.as_ref(), quality)?
                    }
                    PixelData::Rgba8(_) => {
                        let rgb = image.pixels().to_rgb8();
                        crate::codecs::jpeg::encode_rgb8(rgb.as_ref(), quality)?
                    }
                };
                Ok(EncodeOutput {
                    data,
                    format: ImageFormat::Jpeg,
                })
            }
            #[cfg(not(feature = "jpeg"))]
            ImageFormat::Jpeg => Err(CodecError::UnsupportedFormat(self.format)),

            ImageFormat::Tiff | ImageFormat::WebP | ImageFormat::Raw => {
                Err(CodecError::UnsupportedOperation {
                    format: self.format,
                    detail: "encoding",
                })
            }
        }
    }
}

/// Encode `image` and write it to `path`.
///
/// The encoder is chosen by the path's `.png`/`.jpg` extension
/// (case-insensitive); any other path fails before anything is written.
/// Encoding happens fully in memory and the file is written in a single
/// operation, so a failed encode never leaves a partial file behind.
pub fn save_to_file(
    image: &DecodedImage,
    path: impl AsRef<Path>,
    rgb_fallback: bool,
) -> Result<(), CodecError> {
    let path = path.as_ref();
    let format = ImageFormat::from_save_path(path).ok_or_else(|| {
        CodecError::InvalidInput(format!(
            "no encoder for path {}; expected a .png or .jpg extension",
            path.display()
        ))
    })?;

    let output = EncodeRequest::new(format)
        .with_rgb_fallback(rgb_fallback)
        .encode(image)?;
    log::debug!(
        "writing {} bytes of {:?} to {}",
        output.data.len(),
        output.format,
        path.display()
    );

    fs::write(path, output.data)?;
    Ok(())
}
