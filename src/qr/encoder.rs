//! QR code renderer

use crate::color::{BACKGROUND_COLOR, QrColor, parse_hex_color};
use crate::error::Result;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use qrcode::render::unicode::Dense1x2;
use qrcode::{Color, EcLevel, QrCode};
use std::path::PathBuf;

/// Centered logo overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoSettings {
    /// Image file drawn over the center of the code
    pub path: PathBuf,
    /// Overlay width in pixels
    pub width: u32,
    /// Overlay height in pixels
    pub height: u32,
    /// Clear the modules beneath the overlay
    pub excavate: bool,
}

impl LogoSettings {
    /// 48x48 excavated overlay loaded from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            width: 48,
            height: 48,
            excavate: true,
        }
    }
}

/// Fixed rendering parameters shared by every generated code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Edge length of the square surface in pixels
    pub size: u32,
    /// Background color
    pub background: String,
    /// Error correction level
    pub ecc_level: EcLevel,
    /// Optional centered logo
    pub logo: Option<LogoSettings>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size: 240,
            background: BACKGROUND_COLOR.to_string(),
            ecc_level: EcLevel::H,
            logo: None,
        }
    }
}

impl RenderSettings {
    /// Whether modules are excavated on a symbol with less than `Q` error
    /// correction, where the cleared region can exceed what the code recovers.
    pub fn excavation_outweighs_ecc(&self) -> bool {
        let excavates = self.logo.as_ref().is_some_and(|logo| logo.excavate);
        excavates && matches!(self.ecc_level, EcLevel::L | EcLevel::M)
    }
}

/// Rectangle of modules forced light beneath the logo, in module coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excavation {
    /// First excavated column
    pub x: usize,
    /// First excavated row
    pub y: usize,
    /// Number of excavated columns
    pub width: usize,
    /// Number of excavated rows
    pub height: usize,
}

impl Excavation {
    /// Region covered by a `logo_w x logo_h` pixel overlay centered on a
    /// `size`-pixel surface holding `modules` modules per side.
    pub fn for_overlay(modules: usize, size: u32, logo_w: u32, logo_h: u32) -> Self {
        let size = f64::from(size.max(1));
        let (x, width) = centered_span(modules, f64::from(logo_w) * modules as f64 / size);
        let (y, height) = centered_span(modules, f64::from(logo_h) * modules as f64 / size);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn contains(&self, column: usize, row: usize) -> bool {
        (self.x..self.x + self.width).contains(&column)
            && (self.y..self.y + self.height).contains(&row)
    }
}

/// Start and length (both whole modules) of a span of `extent` modules
/// centered on a `modules`-wide grid, rounded outward.
fn centered_span(modules: usize, extent: f64) -> (usize, usize) {
    let start = modules as f64 / 2.0 - extent / 2.0;
    let floor = start.floor();
    let length = (extent + start - floor).ceil();
    let clamped_start = floor.max(0.0);
    let clamped_len = (floor + length).min(modules as f64) - clamped_start;
    (clamped_start as usize, clamped_len.max(0.0) as usize)
}

/// Renders website URLs into fixed-size colored QR surfaces
pub struct QrRenderer {
    settings: RenderSettings,
    logo: Option<RgbaImage>,
}

impl QrRenderer {
    /// Create a renderer, loading the logo overlay if one is configured.
    ///
    /// A logo that cannot be read is skipped with a warning; its excavation
    /// is still applied.
    pub fn new(settings: RenderSettings) -> Self {
        let logo = settings.logo.as_ref().and_then(|logo| match load_logo(logo) {
            Ok(image) => Some(image),
            Err(err) => {
                tracing::warn!(
                    path = %logo.path.display(),
                    error = %err,
                    "Logo overlay unavailable, rendering without it"
                );
                None
            }
        });

        Self { settings, logo }
    }

    /// Create a renderer with an already decoded logo image.
    pub fn with_logo_image(settings: RenderSettings, logo: RgbaImage) -> Self {
        let logo = match settings.logo.as_ref() {
            Some(overlay) => {
                imageops::resize(&logo, overlay.width, overlay.height, FilterType::Triangle)
            }
            None => logo,
        };
        Self {
            settings,
            logo: Some(logo),
        }
    }

    /// Rendering parameters in use.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Whether a logo image was loaded.
    pub fn has_logo(&self) -> bool {
        self.logo.is_some() && self.settings.logo.is_some()
    }

    /// Render `content` as a `size x size` surface in the given foreground color.
    pub fn render(&self, content: &str, foreground: &QrColor) -> Result<RgbaImage> {
        let fg = foreground.to_rgba()?;
        let bg = parse_hex_color(&self.settings.background)?;

        let code = QrCode::with_error_correction_level(content.as_bytes(), self.settings.ecc_level)?;
        let modules = code.width();
        let mut dark: Vec<bool> = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();

        if let Some(excavation) = self.excavation(modules) {
            for (index, cell) in dark.iter_mut().enumerate() {
                if excavation.contains(index % modules, index / modules) {
                    *cell = false;
                }
            }
        }

        let size = self.settings.size.max(1);
        if (size as usize) < modules {
            tracing::warn!(size, modules, "Surface smaller than module grid; code may not scan");
        }

        let mut surface = RgbaImage::from_fn(size, size, |x, y| {
            let column = x as usize * modules / size as usize;
            let row = y as usize * modules / size as usize;
            if dark[row * modules + column] { fg } else { bg }
        });

        if let (Some(logo), Some(overlay)) = (self.logo.as_ref(), self.settings.logo.as_ref()) {
            let x = (i64::from(size) - i64::from(overlay.width)) / 2;
            let y = (i64::from(size) - i64::from(overlay.height)) / 2;
            imageops::overlay(&mut surface, logo, x, y);
        }

        tracing::debug!(
            content_len = content.len(),
            version_modules = modules,
            size,
            logo = self.logo.is_some(),
            "Rendered QR surface"
        );

        Ok(surface)
    }

    /// Module region cleared beneath the logo for a grid of `modules` per side.
    pub fn excavation(&self, modules: usize) -> Option<Excavation> {
        self.settings
            .logo
            .as_ref()
            .filter(|logo| logo.excavate)
            .map(|logo| Excavation::for_overlay(modules, self.settings.size, logo.width, logo.height))
    }

    /// Unicode half-block rendering of `content` for terminals.
    pub fn terminal_preview(&self, content: &str) -> Result<String> {
        let code = QrCode::with_error_correction_level(content.as_bytes(), self.settings.ecc_level)?;
        Ok(code
            .render::<Dense1x2>()
            .dark_color(Dense1x2::Light)
            .light_color(Dense1x2::Dark)
            .build())
    }
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

fn load_logo(logo: &LogoSettings) -> Result<RgbaImage> {
    let image = image::open(&logo.path)?;
    Ok(image
        .resize_exact(logo.width, logo.height, FilterType::Triangle)
        .to_rgba8())
}
