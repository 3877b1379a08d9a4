//! TIFF codec adapter using the tiff crate.
//!
//! Decode only; TIFF is not an encode target.

use imgref::ImgVec;
use rgb::Rgba;

use crate::pixel::{self, PixelData};
use crate::source::ByteSource;
use crate::{CodecError, DecodedImage, ImageFormat, Limits};

/// Decode TIFF into canonical pixels.
///
/// Output is always top-left-oriented, premultiplied RGBA8888: gray is
/// expanded, 16-bit samples reduce to their high byte, sources without an
/// alpha channel get an opaque one, and the premultiply transform runs over
/// the result. Sample layouts outside Gray/GrayA/RGB/RGBA at 8 or 16 bits
/// are rejected.
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<DecodedImage, CodecError> {
    let mut decoder = tiff::decoder::Decoder::new(ByteSource::new(data))
        .map_err(|e| CodecError::from_codec(ImageFormat::Tiff, e))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| CodecError::from_codec(ImageFormat::Tiff, e))?;
    if let Some(lim) = limits {
        lim.check_dimensions(width, height)?;
    }

    let color_type = decoder
        .colortype()
        .map_err(|e| CodecError::from_codec(ImageFormat::Tiff, e))?;

    // Descriptive tags only; decode logic never branches on them.
    log::debug!(
        "tiff {}x{} {:?}, bits-per-sample {:?}, samples-per-pixel {:?}, planar {:?}",
        width,
        height,
        color_type,
        decoder.find_tag(tiff::tags::Tag::BitsPerSample).ok().flatten(),
        decoder.find_tag(tiff::tags::Tag::SamplesPerPixel).ok().flatten(),
        decoder
            .find_tag(tiff::tags::Tag::PlanarConfiguration)
            .ok()
            .flatten(),
    );

    let image = decoder
        .read_image()
        .map_err(|e| CodecError::from_codec(ImageFormat::Tiff, e))?;

    let mut rgba = to_rgba8(color_type, image)?;
    pixel::premultiply_in_place(&mut rgba);

    let img = ImgVec::new(rgba, width as usize, height as usize);
    Ok(DecodedImage::from_parts(PixelData::Rgba8(img), true))
}

/// Normalize a decoded sample buffer to straight-alpha RGBA8888.
fn to_rgba8(
    color_type: tiff::ColorType,
    image: tiff::decoder::DecodingResult,
) -> Result<Vec<Rgba<u8>>, CodecError> {
    use tiff::ColorType;
    use tiff::decoder::DecodingResult;

    let rgba = match (color_type, image) {
        (ColorType::RGBA(8), DecodingResult::U8(buf)) => bytemuck::cast_slice(&buf).to_vec(),
        (ColorType::RGB(8), DecodingResult::U8(buf)) => buf
            .chunks_exact(3)
            .map(|px| Rgba {
                r: px[0],
                g: px[1],
                b: px[2],
                a: 255,
            })
            .collect(),
        (ColorType::Gray(8), DecodingResult::U8(buf)) => buf
            .iter()
            .map(|&v| Rgba {
                r: v,
                g: v,
                b: v,
                a: 255,
            })
            .collect(),
        (ColorType::GrayA(8), DecodingResult::U8(buf)) => buf
            .chunks_exact(2)
            .map(|ga| Rgba {
                r: ga[0],
                g: ga[0],
                b: ga[0],
                a: ga[1],
            })
            .collect(),
        (ColorType::RGBA(16), DecodingResult::U16(buf)) => buf
            .chunks_exact(4)
            .map(|px| Rgba {
                r: hi(px[0]),
                g: hi(px[1]),
                b: hi(px[2]),
                a: hi(px[3]),
            })
            .collect(),
        (ColorType::RGB(16), DecodingResult::U16(buf)) => buf
            .chunks_exact(3)
            .map(|px| Rgba {
                r: hi(px[0]),
                g: hi(px[1]),
                b: hi(px[2]),
                a: 255,
            })
            .collect(),
        (ColorType::Gray(16), DecodingResult::U16(buf)) => buf
            .iter()
            .map(|&v| Rgba {
                r: hi(v),
                g: hi(v),
                b: hi(v),
                a: 255,
            })
            .collect(),
        (ColorType::GrayA(16), DecodingResult::U16(buf)) => buf
            .chunks_exact(2)
            .map(|ga| Rgba {
                r: hi(ga[0]),
                g: hi(ga[0]),
                b: hi(ga[0]),
                a: hi(ga[1]),
            })
            .collect(),
        (other, _) => {
            log::warn!("tiff sample layout not supported: {other:?}");
            return Err(CodecError::UnsupportedOperation {
                format: ImageFormat::Tiff,
                detail: "unsupported sample layout",
            });
        }
    };

    Ok(rgba)
}

/// Reduce a 16-bit sample to its high byte.
#[inline]
fn hi(v: u16) -> u8 {
    (v >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tiff::encoder::{TiffEncoder, colortype};

    fn encode_fixture<C: colortype::ColorType>(
        width: u32,
        height: u32,
        data: &[C::Inner],
    ) -> Vec<u8>
    where
        [C::Inner]: tiff::encoder::TiffValue,
    {
        let mut cursor = Cursor::new(Vec::new());
        let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
        encoder.write_image::<C>(width, height, data).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn rgba_fixture_decodes_premultiplied() {
        // Opaque red, half-transparent (200,100,50).
        let data: &[u8] = &[255, 0, 0, 255, 200, 100, 50, 128];
        let encoded = encode_fixture::<colortype::RGBA8>(2, 1, data);
        assert_eq!(&encoded[..2], b"II");

        let decoded = decode(&encoded, None).unwrap();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 1);
        assert!(decoded.has_alpha());
        assert!(decoded.is_premultiplied());
        assert_eq!(decoded.bits_per_component(), 8);
        match decoded.pixels() {
            PixelData::Rgba8(img) => {
                // Opaque pixel passes through the premultiply unchanged.
                assert_eq!(
                    img.buf()[0],
                    Rgba {
                        r: 255,
                        g: 0,
                        b: 0,
                        a: 255
                    }
                );
                // (200,100,50,128) scales by 129/256.
                assert_eq!(
                    img.buf()[1],
                    Rgba {
                        r: 100,
                        g: 50,
                        b: 25,
                        a: 128
                    }
                );
            }
            other => panic!("expected Rgba8, got {other:?}"),
        }
    }

    #[test]
    fn rgb_fixture_gains_opaque_alpha() {
        let data: &[u8] = &[10, 20, 30, 40, 50, 60];
        let encoded = encode_fixture::<colortype::RGB8>(2, 1, data);

        let decoded = decode(&encoded, None).unwrap();
        assert!(decoded.has_alpha());
        assert!(decoded.is_premultiplied());
        match decoded.pixels() {
            PixelData::Rgba8(img) => {
                assert_eq!(
                    img.buf()[0],
                    Rgba {
                        r: 10,
                        g: 20,
                        b: 30,
                        a: 255
                    }
                );
                assert_eq!(
                    img.buf()[1],
                    Rgba {
                        r: 40,
                        g: 50,
                        b: 60,
                        a: 255
                    }
                );
            }
            other => panic!("expected Rgba8, got {other:?}"),
        }
    }

    #[test]
    fn gray_fixture_expands() {
        let data: &[u8] = &[0x40, 0xC0];
        let encoded = encode_fixture::<colortype::Gray8>(2, 1, data);

        let decoded = decode(&encoded, None).unwrap();
        match decoded.pixels() {
            PixelData::Rgba8(img) => {
                assert_eq!(
                    img.buf()[0],
                    Rgba {
                        r: 0x40,
                        g: 0x40,
                        b: 0x40,
                        a: 255
                    }
                );
            }
            other => panic!("expected Rgba8, got {other:?}"),
        }
    }

    #[test]
    fn sixteen_bit_reduces_to_high_byte() {
        let data: &[u16] = &[0x0000, 0x8080, 0xFFFF, 0xFFFF];
        let encoded = encode_fixture::<colortype::RGBA16>(1, 1, data);

        let decoded = decode(&encoded, None).unwrap();
        match decoded.pixels() {
            PixelData::Rgba8(img) => {
                assert_eq!(
                    img.buf()[0],
                    Rgba {
                        r: 0x00,
                        g: 0x80,
                        b: 0xFF,
                        a: 0xFF
                    }
                );
            }
            other => panic!("expected Rgba8, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_garbage_input_fail() {
        assert!(decode(&[], None).is_err());
        assert!(decode(b"II*\x00 not actually a tiff", None).is_err());
    }

    #[test]
    fn truncated_stream_fails() {
        let data: &[u8] = &[255, 0, 0, 255];
        let encoded = encode_fixture::<colortype::RGBA8>(1, 1, data);
        assert!(decode(&encoded[..encoded.len() / 2], None).is_err());
    }

    #[test]
    fn limits_reject_before_decode() {
        let data: &[u8] = &[255, 0, 0, 255];
        let encoded = encode_fixture::<colortype::RGBA8>(1, 1, data);

        let limits = Limits {
            max_height: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            decode(&encoded, Some(&limits)),
            Err(CodecError::LimitExceeded(_))
        ));
    }
}
