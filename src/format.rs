//! Image format tags and magic-byte detection.

use std::path::Path;

/// Supported image formats.
///
/// `WebP` is a declared format without a codec in this crate: dispatching to
/// it fails with [`UnsupportedFormat`](crate::CodecError::UnsupportedFormat)
/// rather than being silently absent. `Raw` tags caller-supplied RGBA8888
/// data, which carries its geometry out of band and is adopted through
/// [`DecodedImage::from_raw`](crate::DecodedImage::from_raw).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Tiff,
    Jpeg,
    WebP,
    Raw,
}

/// Eight-byte signature every PNG stream starts with.
pub(crate) const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

impl ImageFormat {
    /// Detect format from magic bytes. Returns None if unrecognized.
    ///
    /// Classifies from leading bytes only, never from a file extension.
    /// PNG is checked first, then TIFF, then JPEG; a buffer too short for a
    /// check cannot match it.
    pub fn detect(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.len() >= 8 && data[..8] == PNG_SIGNATURE {
            return Some(ImageFormat::Png);
        }

        // TIFF: "II" (little-endian) or "MM" (big-endian)
        if data.len() >= 2 && (&data[..2] == b"II" || &data[..2] == b"MM") {
            return Some(ImageFormat::Tiff);
        }

        // JPEG: FF D8
        if data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8 {
            return Some(ImageFormat::Jpeg);
        }

        None
    }

    /// Resolve the encoder format from a save path's extension.
    ///
    /// Only `.png` and `.jpg` (ASCII case-insensitive) map to an encoder;
    /// anything else, including extensionless paths, returns None.
    pub fn from_save_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("png") {
            Some(ImageFormat::Png)
        } else if ext.eq_ignore_ascii_case("jpg") {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_png() {
        let data = [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
        ];
        assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Png));
    }

    #[test]
    fn detect_png_signature_alone() {
        // Exactly the signature, no trailing chunks.
        let data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Png));
    }

    #[test]
    fn detect_png_truncated_signature() {
        let data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A];
        assert_eq!(ImageFormat::detect(&data), None);
    }

    #[test]
    fn detect_tiff_little_endian() {
        assert_eq!(ImageFormat::detect(b"II*\x00"), Some(ImageFormat::Tiff));
    }

    #[test]
    fn detect_tiff_big_endian() {
        assert_eq!(ImageFormat::detect(b"MM\x00*"), Some(ImageFormat::Tiff));
    }

    #[test]
    fn detect_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn detect_jpeg_two_bytes() {
        assert_eq!(ImageFormat::detect(&[0xFF, 0xD8]), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn detect_unknown() {
        assert_eq!(ImageFormat::detect(b"GIF89a"), None);
        assert_eq!(ImageFormat::detect(&[0x00]), None);
        assert_eq!(ImageFormat::detect(&[]), None);
    }

    #[test]
    fn save_path_case_insensitive() {
        assert_eq!(
            ImageFormat::from_save_path(Path::new("out.png")),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_save_path(Path::new("OUT.PNG")),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_save_path(Path::new("photo.Jpg")),
            Some(ImageFormat::Jpeg)
        );
    }

    #[test]
    fn save_path_rejects_everything_else() {
        // ".jpeg" is deliberately not an encoder extension.
        assert_eq!(ImageFormat::from_save_path(Path::new("photo.jpeg")), None);
        assert_eq!(ImageFormat::from_save_path(Path::new("out.tiff")), None);
        assert_eq!(ImageFormat::from_save_path(Path::new("noext")), None);
        assert_eq!(ImageFormat::from_save_path(Path::new(".png")), None);
        assert_eq!(ImageFormat::from_save_path(Path::new("")), None);
    }
}
