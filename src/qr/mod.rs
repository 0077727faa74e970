//! QR code rendering and scan verification
//!
//! Symbol encoding is delegated to the `qrcode` crate; this module only lays
//! the modules out on a fixed-size raster, applies colors and the centered
//! logo overlay. Decoding (via `rqrr`) is used to verify that a rendered
//! surface still scans.

mod decoder;
mod encoder;

pub use decoder::QrDecoder;
pub use encoder::{Excavation, LogoSettings, QrRenderer, RenderSettings};

pub use qrcode::EcLevel;

/// Parse an error-correction level identifier (`L`, `M`, `Q`, `H`, any case).
pub fn parse_ecc_level(value: &str) -> Option<EcLevel> {
    match value.trim().to_ascii_uppercase().as_str() {
        "L" | "LOW" => Some(EcLevel::L),
        "M" | "MEDIUM" => Some(EcLevel::M),
        "Q" | "QUARTILE" => Some(EcLevel::Q),
        "H" | "HIGH" => Some(EcLevel::H),
        _ => None,
    }
}

/// Single-letter label for an error-correction level.
pub fn ecc_label(level: EcLevel) -> &'static str {
    match level {
        EcLevel::L => "L",
        EcLevel::M => "M",
        EcLevel::Q => "Q",
        EcLevel::H => "H",
    }
}
