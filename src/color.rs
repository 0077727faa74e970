//! Foreground color handling
//!
//! The color picker hands over arbitrary strings and they are stored untouched.
//! Parsing into pixel values only happens when a surface is rendered.

use crate::error::{Error, Result};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default foreground color (dark slate).
pub const DEFAULT_QR_COLOR: &str = "#020617";

/// Fixed background color of every rendered code.
pub const BACKGROUND_COLOR: &str = "#ffffff";

/// Color value as chosen by the user, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QrColor(String);

impl QrColor {
    /// Wrap any string, no validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value exactly as it was set.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-cased label shown next to the swatch.
    pub fn label(&self) -> String {
        self.0.to_uppercase()
    }

    /// Resolve the value into an opaque pixel color.
    pub fn to_rgba(&self) -> Result<Rgba<u8>> {
        parse_hex_color(&self.0)
    }
}

impl Default for QrColor {
    fn default() -> Self {
        Self(DEFAULT_QR_COLOR.to_string())
    }
}

impl fmt::Display for QrColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QrColor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for QrColor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Parse `#rgb` / `#rrggbb` (leading `#` optional, any case) into an opaque color.
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>> {
    let digits = value.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);

    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return Err(Error::InvalidColor(value.to_string())),
    };

    let bytes = hex::decode(&expanded).map_err(|_| Error::InvalidColor(value.to_string()))?;
    match bytes.as_slice() {
        [r, g, b] => Ok(Rgba([*r, *g, *b, 0xff])),
        _ => Err(Error::InvalidColor(value.to_string())),
    }
}
