//! One interactive generator instance
//!
//! A [`QrGenerator`] owns the widget state together with its renderer and
//! exporter. Each [`Event`] runs to completion before the next one is applied.

use crate::color::QrColor;
use crate::config::QrcraftConfig;
use crate::error::{Error, Result};
use crate::export::{Exporter, SaveTarget};
use crate::qr::QrRenderer;
use crate::state::{GeneratorState, Phase};
use crate::validate::InputIndicator;
use image::RgbaImage;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// User interaction applied to the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// New content of the URL field
    Input(String),
    /// New value from the color picker
    Color(String),
    /// "Generate QR" pressed
    Generate,
    /// "Download QR" pressed
    Download,
    /// "Reset" pressed
    Reset,
}

/// What an applied event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Field text or color changed
    Updated,
    /// A code is now displayed for `url`
    Generated {
        /// Encoded URL
        url: String,
    },
    /// Generate pressed while the input was not valid
    GenerateIgnored,
    /// The displayed code was saved
    Downloaded {
        /// Location reported by the save target
        path: PathBuf,
    },
    /// Every field was restored
    Reset,
}

/// Presentation snapshot of the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    /// Current field text
    pub input: String,
    /// Field decoration
    pub indicator: InputIndicator,
    /// Line shown beneath the field
    pub status: Option<&'static str>,
    /// Whether "Generate QR" is enabled
    pub generate_enabled: bool,
    /// Whether "Download QR" is shown
    pub download_visible: bool,
    /// Raw color value
    pub color: String,
    /// Upper-cased color label
    pub color_label: String,
    /// URL encoded by the displayed code
    pub finalized_url: Option<String>,
    /// Lifecycle phase
    pub phase: Phase,
}

/// Generator widget: state plus rendering and export collaborators
pub struct QrGenerator {
    state: GeneratorState,
    renderer: QrRenderer,
    exporter: Exporter,
}

impl QrGenerator {
    /// Build a generator whose initial and reset color is `default_color`.
    pub fn new(renderer: QrRenderer, exporter: Exporter, default_color: QrColor) -> Self {
        Self {
            state: GeneratorState::with_default_color(default_color),
            renderer,
            exporter,
        }
    }

    /// Build a generator from resolved configuration.
    pub fn from_config(config: &QrcraftConfig) -> Result<Self> {
        let renderer = QrRenderer::new(config.render_settings()?);
        let exporter = Exporter::new(config.export.file_name.clone())?;
        Ok(Self::new(renderer, exporter, config.render.default_color()))
    }

    /// Apply one event.
    ///
    /// `target` is only used by [`Event::Download`].
    pub fn apply(&mut self, event: Event, target: &dyn SaveTarget) -> Result<Outcome> {
        debug!(?event, phase = ?self.state.phase(), "Applying event");
        match event {
            Event::Input(text) => {
                self.input(text);
                Ok(Outcome::Updated)
            }
            Event::Color(value) => {
                self.set_color(value);
                Ok(Outcome::Updated)
            }
            Event::Generate => self.generate(),
            Event::Download => self.download(target).map(|path| Outcome::Downloaded { path }),
            Event::Reset => {
                self.reset();
                Ok(Outcome::Reset)
            }
        }
    }

    /// Replace the field text.
    pub fn input(&mut self, text: impl Into<String>) {
        self.state.input(text);
    }

    /// Replace the foreground color; a displayed code follows it.
    pub fn set_color(&mut self, value: impl Into<QrColor>) {
        self.state.set_color(value);
    }

    /// Generate a code from the current input.
    ///
    /// The candidate is rendered before the state commits, so content that
    /// cannot be encoded or an unusable color leaves the state untouched.
    pub fn generate(&mut self) -> Result<Outcome> {
        let Some(url) = self.state.generation_candidate() else {
            debug!(input = self.state.raw_input(), "Generate ignored, input not valid");
            return Ok(Outcome::GenerateIgnored);
        };

        self.renderer.render(&url, self.state.color())?;

        if !self.state.generate() {
            return Ok(Outcome::GenerateIgnored);
        }
        info!(%url, color = %self.state.color(), "Generated QR code");
        Ok(Outcome::Generated { url })
    }

    /// Save the displayed code, rendered with the color selected right now.
    pub fn download(&self, target: &dyn SaveTarget) -> Result<PathBuf> {
        let surface = self.surface()?.ok_or(Error::NothingToExport)?;
        self.exporter.export(&surface, target)
    }

    /// Restore every field.
    pub fn reset(&mut self) {
        self.state.reset();
        debug!("Generator reset");
    }

    /// Live surface of the displayed code, `None` when nothing is displayed.
    pub fn surface(&self) -> Result<Option<RgbaImage>> {
        match self.displayed_url() {
            Some(url) => self.renderer.render(url, self.state.color()).map(Some),
            None => Ok(None),
        }
    }

    /// Terminal rendering of the displayed code.
    pub fn terminal_preview(&self) -> Result<Option<String>> {
        match self.displayed_url() {
            Some(url) => self.renderer.terminal_preview(url).map(Some),
            None => Ok(None),
        }
    }

    fn displayed_url(&self) -> Option<&str> {
        if self.state.is_displayed() {
            self.state.finalized_url()
        } else {
            None
        }
    }

    /// Snapshot for presentation.
    pub fn view(&self) -> View {
        let validation = self.state.validation();
        View {
            input: self.state.raw_input().to_string(),
            indicator: validation.indicator(),
            status: validation.status_message(),
            generate_enabled: self.state.can_generate(),
            download_visible: self.state.can_download(),
            color: self.state.color().as_str().to_string(),
            color_label: self.state.color().label(),
            finalized_url: self.displayed_url().map(str::to_string),
            phase: self.state.phase(),
        }
    }

    /// Underlying state.
    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    /// Renderer in use.
    pub fn renderer(&self) -> &QrRenderer {
        &self.renderer
    }

    /// Exporter in use.
    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }
}

impl Default for QrGenerator {
    fn default() -> Self {
        Self::new(QrRenderer::default(), Exporter::default(), QrColor::default())
    }
}
