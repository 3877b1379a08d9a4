//! Decode resource limits.

use crate::error::CodecError;

/// Resource limits for decode operations.
///
/// Checked after a codec has read the stream header and before any pixel
/// buffer is allocated. All limits are optional.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Maximum image width in pixels.
    pub max_width: Option<u32>,
    /// Maximum image height in pixels.
    pub max_height: Option<u32>,
    /// Maximum total pixels (width × height).
    pub max_pixels: Option<u64>,
}

impl Limits {
    /// Create a new Limits with no restrictions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if dimensions are within limits.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), CodecError> {
        if let Some(max_width) = self.max_width {
            if width > max_width {
                return Err(CodecError::LimitExceeded("width exceeds limit"));
            }
        }

        if let Some(max_height) = self.max_height {
            if height > max_height {
                return Err(CodecError::LimitExceeded("height exceeds limit"));
            }
        }

        if let Some(max_pixels) = self.max_pixels {
            let pixels = u64::from(width).saturating_mul(u64::from(height));
            if pixels > max_pixels {
                return Err(CodecError::LimitExceeded("pixel count exceeds limit"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_none() {
        let limits = Limits::none();
        assert!(limits.check_dimensions(u32::MAX, u32::MAX).is_ok());
    }

    #[test]
    fn limits_dimensions() {
        let limits = Limits {
            max_width: Some(1000),
            max_height: Some(1000),
            max_pixels: Some(500_000),
        };

        assert!(limits.check_dimensions(500, 500).is_ok()); // 250k pixels
        assert!(limits.check_dimensions(1000, 1000).is_err()); // 1M pixels > 500k
        assert!(limits.check_dimensions(2000, 10).is_err()); // width > 1000
        assert!(limits.check_dimensions(10, 2000).is_err()); // height > 1000
    }

    #[test]
    fn limit_error_variant() {
        let limits = Limits {
            max_pixels: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            limits.check_dimensions(2, 2),
            Err(CodecError::LimitExceeded(_))
        ));
    }
}
