//! Presentation state of the generator widget
//!
//! One [`GeneratorState`] owns every field the widget needs. Transitions only
//! happen in response to the event methods below.

use crate::color::QrColor;
use crate::validate::{ValidationResult, normalize, validate};
use serde::Serialize;

/// Where the widget currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing typed yet, or the field was cleared
    Empty,
    /// Non-empty text that does not validate
    Invalid,
    /// Valid text, not generated yet
    Valid,
    /// A code was generated from the current text
    Generated,
}

/// All mutable widget state
#[derive(Debug, Clone)]
pub struct GeneratorState {
    raw_input: String,
    validation: ValidationResult,
    finalized_url: Option<String>,
    color: QrColor,
    default_color: QrColor,
    displayed: bool,
    phase: Phase,
}

impl GeneratorState {
    /// Fresh state using the built-in default color.
    pub fn new() -> Self {
        Self::with_default_color(QrColor::default())
    }

    /// Fresh state whose color (and reset target) is `default_color`.
    pub fn with_default_color(default_color: QrColor) -> Self {
        Self {
            raw_input: String::new(),
            validation: ValidationResult::neutral(),
            finalized_url: None,
            color: default_color.clone(),
            default_color,
            displayed: false,
            phase: Phase::Empty,
        }
    }

    /// Replace the field text and re-validate.
    ///
    /// A displayed code stays displayed; only generate/reset change it.
    pub fn input(&mut self, text: impl Into<String>) {
        self.raw_input = text.into();
        self.validation = validate(&self.raw_input);
        self.phase = phase_for(&self.raw_input, &self.validation);
    }

    /// Normalized URL the next generate would commit, if the input validates.
    pub fn generation_candidate(&self) -> Option<String> {
        validate(&self.raw_input)
            .valid
            .then(|| normalize(&self.raw_input))
    }

    /// Commit the current input as the displayed code.
    ///
    /// Returns `false` and leaves every field untouched when the input does
    /// not validate.
    pub fn generate(&mut self) -> bool {
        let Some(url) = self.generation_candidate() else {
            return false;
        };

        self.finalized_url = Some(url);
        self.displayed = true;
        self.phase = Phase::Generated;
        true
    }

    /// Return every field to its initial value.
    pub fn reset(&mut self) {
        self.raw_input.clear();
        self.validation = ValidationResult::neutral();
        self.finalized_url = None;
        self.displayed = false;
        self.color = self.default_color.clone();
        self.phase = Phase::Empty;
    }

    /// Overwrite the color; any string is accepted.
    pub fn set_color(&mut self, color: impl Into<QrColor>) {
        self.color = color.into();
    }

    /// Current field text.
    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    /// Validation result of the current text.
    pub fn validation(&self) -> ValidationResult {
        self.validation
    }

    /// URL encoded by the displayed code.
    pub fn finalized_url(&self) -> Option<&str> {
        self.finalized_url.as_deref()
    }

    /// Current foreground color.
    pub fn color(&self) -> &QrColor {
        &self.color
    }

    /// Color restored by [`GeneratorState::reset`].
    pub fn default_color(&self) -> &QrColor {
        &self.default_color
    }

    /// Whether a code is being shown.
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Generate button enabled.
    pub fn can_generate(&self) -> bool {
        self.validation.valid
    }

    /// Download button visible.
    pub fn can_download(&self) -> bool {
        self.displayed
    }
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self::new()
    }
}

fn phase_for(raw: &str, validation: &ValidationResult) -> Phase {
    if raw.is_empty() {
        Phase::Empty
    } else if validation.valid {
        Phase::Valid
    } else {
        Phase::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_QR_COLOR;

    #[test]
    fn test_starts_empty_with_defaults() {
        let state = GeneratorState::new();
        assert_eq!(state.phase(), Phase::Empty);
        assert_eq!(state.raw_input(), "");
        assert_eq!(state.finalized_url(), None);
        assert_eq!(state.color().as_str(), DEFAULT_QR_COLOR);
        assert!(!state.is_displayed());
        assert!(!state.can_generate());
        assert!(!state.can_download());
    }

    #[test]
    fn test_typing_moves_between_input_phases() {
        let mut state = GeneratorState::new();
        state.input("exa");
        assert_eq!(state.phase(), Phase::Invalid);
        state.input("example.com");
        assert_eq!(state.phase(), Phase::Valid);
        assert!(state.can_generate());
        state.input("");
        assert_eq!(state.phase(), Phase::Empty);
        assert!(!state.can_generate());
    }

    #[test]
    fn test_generate_commits_normalized_url() {
        let mut state = GeneratorState::new();
        state.input(" example.com ");
        assert!(state.generate());
        assert_eq!(state.phase(), Phase::Generated);
        assert_eq!(state.finalized_url(), Some("https://example.com"));
        assert!(state.is_displayed());
        assert!(state.can_download());
    }

    #[test]
    fn test_generate_with_invalid_input_changes_nothing() {
        let mut state = GeneratorState::new();
        state.input("http://localhost");
        state.set_color("#123456");
        let before = format!("{state:?}");

        assert!(!state.generate());
        assert_eq!(format!("{state:?}"), before);
        assert_eq!(state.phase(), Phase::Invalid);
        assert!(!state.is_displayed());
    }

    #[test]
    fn test_generate_with_empty_input_is_a_no_op() {
        let mut state = GeneratorState::new();
        assert!(!state.generate());
        assert_eq!(state.phase(), Phase::Empty);
    }

    #[test]
    fn test_typing_after_generate_keeps_the_displayed_code() {
        let mut state = GeneratorState::new();
        state.input("example.com");
        state.generate();

        state.input("not a url");
        assert_eq!(state.phase(), Phase::Invalid);
        assert!(state.is_displayed());
        assert_eq!(state.finalized_url(), Some("https://example.com"));

        state.input("rust-lang.org");
        assert!(state.generate());
        assert_eq!(state.finalized_url(), Some("https://rust-lang.org"));
    }

    #[test]
    fn test_reset_restores_every_field() {
        let mut state = GeneratorState::new();
        state.input("example.com");
        state.set_color("#ff0000");
        state.generate();

        state.reset();
        assert_eq!(state.phase(), Phase::Empty);
        assert_eq!(state.raw_input(), "");
        assert_eq!(state.validation(), ValidationResult::neutral());
        assert_eq!(state.finalized_url(), None);
        assert!(!state.is_displayed());
        assert_eq!(state.color().as_str(), DEFAULT_QR_COLOR);
    }

    #[test]
    fn test_reset_restores_configured_default_color() {
        let mut state = GeneratorState::with_default_color(QrColor::new("#1e40af"));
        state.set_color("not-a-color");
        state.reset();
        assert_eq!(state.color().as_str(), "#1e40af");
    }

    #[test]
    fn test_color_changes_are_unvalidated() {
        let mut state = GeneratorState::new();
        state.set_color("definitely not hex");
        assert_eq!(state.color().as_str(), "definitely not hex");
        assert_eq!(state.phase(), Phase::Empty);
    }
}
