//! JPEG codec adapter using jpeg-decoder and jpeg-encoder.

use imgref::{ImgRef, ImgVec};
use rgb::Rgb;

use crate::pixel::PixelData;
use crate::source::ByteSource;
use crate::{CodecError, DecodedImage, ImageFormat, Limits};

/// Quality handed to the encoder when the caller sets none.
pub(crate) const DEFAULT_QUALITY: u8 = 75;

/// Reject color spaces outside the RGB / grayscale / YCbCr support set.
///
/// Runs against the parsed header, before any pixel data is decoded.
fn ensure_supported(format: jpeg_decoder::PixelFormat) -> Result<(), CodecError> {
    match format {
        jpeg_decoder::PixelFormat::RGB24 | jpeg_decoder::PixelFormat::L8 => Ok(()),
        jpeg_decoder::PixelFormat::CMYK32 => Err(CodecError::UnsupportedOperation {
            format: ImageFormat::Jpeg,
            detail: "CMYK color space",
        }),
        _ => Err(CodecError::UnsupportedOperation {
            format: ImageFormat::Jpeg,
            detail: "16-bit grayscale output",
        }),
    }
}

/// Decode JPEG into canonical pixels.
///
/// YCbCr and RGB streams come out of the decoder as RGB24; grayscale comes
/// out as L8 and is expanded to RGB here. Output never carries alpha. The
/// decoder crate's error type stands in for libjpeg's fatal-error jump:
/// every failure surfaces as a single `Result` at this boundary and the
/// decoder state is dropped on the way out.
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<DecodedImage, CodecError> {
    let mut decoder = jpeg_decoder::Decoder::new(ByteSource::new(data));
    decoder
        .read_info()
        .map_err(|e| CodecError::from_codec(ImageFormat::Jpeg, e))?;

    let info = decoder
        .info()
        .ok_or_else(|| CodecError::InvalidInput("JPEG header carries no image info".into()))?;
    ensure_supported(info.pixel_format)?;
    if let Some(lim) = limits {
        lim.check_dimensions(u32::from(info.width), u32::from(info.height))?;
    }

    let scanlines = decoder
        .decode()
        .map_err(|e| CodecError::from_codec(ImageFormat::Jpeg, e))?;

    let pixels: Vec<Rgb<u8>> = if info.pixel_format == jpeg_decoder::PixelFormat::L8 {
        scanlines.iter().map(|&v| Rgb { r: v, g: v, b: v }).collect()
    } else {
        bytemuck::cast_slice(&scanlines).to_vec()
    };

    let img = ImgVec::new(pixels, usize::from(info.width), usize::from(info.height));
    Ok(DecodedImage::from_parts(PixelData::Rgb8(img), false))
}

/// Encode RGB8 pixels to JPEG.
pub(crate) fn encode_rgb8(img: ImgRef<'_, Rgb<u8>>, quality: u8) -> Result<Vec<u8>, CodecError> {
    let width = u16::try_from(img.width())
        .map_err(|_| CodecError::InvalidInput("width exceeds JPEG maximum (65535)".into()))?;
    let height = u16::try_from(img.height())
        .map_err(|_| CodecError::InvalidInput("height exceeds JPEG maximum (65535)".into()))?;

    let (buf, _, _) = img.to_contiguous_buf();
    let bytes: &[u8] = bytemuck::cast_slice(buf.as_ref());

    let mut output = Vec::new();
    let encoder = jpeg_encoder::Encoder::new(&mut output, quality);
    encoder
        .encode(bytes, width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| CodecError::from_codec(ImageFormat::Jpeg, e))?;

    Ok(output)
}
