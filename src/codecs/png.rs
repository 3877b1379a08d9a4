//! PNG codec adapter using the png crate.

use imgref::{ImgRef, ImgVec};
use rgb::{Rgb, Rgba};

use crate::format::PNG_SIGNATURE;
use crate::pixel::{self, PixelData};
use crate::source::ByteSource;
use crate::{CodecError, DecodedImage, ImageFormat, Limits};

/// Decode PNG into canonical pixels.
///
/// The stream is normalized while reading: palette entries expand to RGB,
/// sub-8-bit grayscale expands to 8 bits, a tRNS chunk expands to a full
/// alpha channel, 16-bit samples reduce to 8 bits, and grayscale (with or
/// without alpha) expands to RGB. A 4-channel result is premultiplied in
/// place; a 3-channel result stays straight RGB.
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<DecodedImage, CodecError> {
    if data.len() < PNG_SIGNATURE.len() || data[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        return Err(CodecError::InvalidInput("missing PNG signature".into()));
    }

    let mut decoder = png::Decoder::new(ByteSource::new(data));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| CodecError::from_codec(ImageFormat::Png, e))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    if let Some(lim) = limits {
        lim.check_dimensions(width, height)?;
    }

    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| CodecError::InvalidInput("cannot determine PNG output buffer size".into()))?;
    let mut raw = pixel::try_alloc(buffer_size, 0u8)?;

    let output_info = reader
        .next_frame(&mut raw)
        .map_err(|e| CodecError::from_codec(ImageFormat::Png, e))?;
    raw.truncate(output_info.buffer_size());

    let (color_type, _bit_depth) = reader.output_color_type();
    let w = width as usize;
    let h = height as usize;

    let (pixels, premultiplied) = match color_type {
        png::ColorType::Rgb => {
            let rgb: &[Rgb<u8>] = bytemuck::cast_slice(&raw);
            (PixelData::Rgb8(ImgVec::new(rgb.to_vec(), w, h)), false)
        }
        png::ColorType::Rgba => {
            let mut rgba: Vec<Rgba<u8>> = bytemuck::cast_slice(&raw).to_vec();
            pixel::premultiply_in_place(&mut rgba);
            (PixelData::Rgba8(ImgVec::new(rgba, w, h)), true)
        }
        png::ColorType::Grayscale => {
            let rgb: Vec<Rgb<u8>> = raw.iter().map(|&v| Rgb { r: v, g: v, b: v }).collect();
            (PixelData::Rgb8(ImgVec::new(rgb, w, h)), false)
        }
        png::ColorType::GrayscaleAlpha => {
            let mut rgba: Vec<Rgba<u8>> = raw
                .chunks_exact(2)
                .map(|ga| Rgba {
                    r: ga[0],
                    g: ga[0],
                    b: ga[0],
                    a: ga[1],
                })
                .collect();
            pixel::premultiply_in_place(&mut rgba);
            (PixelData::Rgba8(ImgVec::new(rgba, w, h)), true)
        }
        // EXPAND rewrites indexed output to RGB/RGBA before it reaches us.
        png::ColorType::Indexed => {
            return Err(CodecError::InvalidInput(
                "indexed PNG output survived expansion".into(),
            ));
        }
    };

    Ok(DecodedImage::from_parts(pixels, premultiplied))
}

/// Encode RGB8 pixels to PNG.
pub(crate) fn encode_rgb8(img: ImgRef<'_, Rgb<u8>>) -> Result<Vec<u8>, CodecError> {
    let (buf, _, _) = img.to_contiguous_buf();
    let bytes: &[u8] = bytemuck::cast_slice(buf.as_ref());
    write_png(bytes, img.width() as u32, img.height() as u32, png::ColorType::Rgb)
}

/// Encode RGBA8 pixels to PNG.
pub(crate) fn encode_rgba8(img: ImgRef<'_, Rgba<u8>>) -> Result<Vec<u8>, CodecError> {
    let (buf, _, _) = img.to_contiguous_buf();
    let bytes: &[u8] = bytemuck::cast_slice(buf.as_ref());
    write_png(bytes, img.width() as u32, img.height() as u32, png::ColorType::Rgba)
}

fn write_png(
    bytes: &[u8],
    width: u32,
    height: u32,
    color: png::ColorType,
) -> Result<Vec<u8>, CodecError> {
    let mut output = Vec::new();
    let mut encoder = png::Encoder::new(&mut output, width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| CodecError::from_codec(ImageFormat::Png, e))?;
    writer
        .write_image_data(bytes)
        .map_err(|e| CodecError::from_codec(ImageFormat::Png, e))?;
    writer
        .finish()
        .map_err(|e| CodecError::from_codec(ImageFormat::Png, e))?;

    Ok(output)
}
