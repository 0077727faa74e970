//! QR code decoder using rqrr

use crate::error::{Error, Result};
use image::{GrayImage, Luma, RgbaImage, imageops};

/// QR code decoder used to check that rendered surfaces still scan
pub struct QrDecoder {
    /// Border added before detection is the surface width divided by this
    quiet_zone_ratio: u32,
}

impl QrDecoder {
    /// Create a new QR decoder with default settings
    pub fn new() -> Self {
        Self { quiet_zone_ratio: 8 }
    }

    /// Decode the content of a rendered surface
    pub fn decode(&self, surface: &RgbaImage) -> Result<String> {
        let gray = image::DynamicImage::ImageRgba8(surface.clone()).to_luma8();
        self.decode_gray(&gray)
    }

    /// Decode a QR code from a grayscale image
    pub fn decode_gray(&self, img: &GrayImage) -> Result<String> {
        // Rendered surfaces carry no margin; detection needs a quiet zone.
        let pad = (img.width() / self.quiet_zone_ratio).max(16);
        let mut padded =
            GrayImage::from_pixel(img.width() + 2 * pad, img.height() + 2 * pad, Luma([255]));
        imageops::replace(&mut padded, img, i64::from(pad), i64::from(pad));

        let mut prepared = rqrr::PreparedImage::prepare(padded);
        let grids = prepared.detect_grids();

        let Some(grid) = grids.first() else {
            return Err(Error::NoQrCodeFound);
        };

        match grid.decode() {
            Ok((meta, content)) => {
                tracing::debug!(
                    "Decoded QR: version={:?}, ecc_level={:?}, length={}",
                    meta.version,
                    meta.ecc_level,
                    content.len()
                );
                Ok(content)
            }
            Err(e) => Err(Error::QrDecode(format!("Decode failed: {:?}", e))),
        }
    }

    /// Check that `surface` decodes to exactly `expected`
    pub fn verify(&self, surface: &RgbaImage, expected: &str) -> Result<()> {
        let decoded = self.decode(surface)?;
        if decoded == expected {
            Ok(())
        } else {
            Err(Error::QrDecode(format!(
                "Surface decodes to '{decoded}', expected '{expected}'"
            )))
        }
    }
}

impl Default for QrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_surface_has_no_code() {
        let decoder = QrDecoder::new();
        let blank = RgbaImage::from_pixel(120, 120, image::Rgba([255, 255, 255, 255]));
        assert!(matches!(decoder.decode(&blank), Err(Error::NoQrCodeFound)));
    }

    #[test]
    fn test_verify_rejects_other_content() {
        use crate::color::QrColor;
        use crate::qr::QrRenderer;

        let surface = QrRenderer::default()
            .render("https://example.com", &QrColor::default())
            .unwrap();
        let decoder = QrDecoder::new();

        assert!(decoder.verify(&surface, "https://example.com").is_ok());
        assert!(matches!(
            decoder.verify(&surface, "https://example.org"),
            Err(Error::QrDecode(_))
        ));
    }
}
