//! Helpers for rendering generator state and event outcomes for a terminal host

use crate::session::{Outcome, View};
use crate::state::Phase;
use crate::validate::InputIndicator;
use serde_json::{Value, json};

/// Combined structured and human-readable representation of a view
#[derive(Debug, Clone)]
pub struct RenderedView {
    /// Structured JSON representation suitable for downstream consumers
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Render a view into both JSON and human-readable forms.
pub fn render_view(view: &View) -> RenderedView {
    let json = view_value(view);
    let mut human = Vec::new();

    let marker = match view.indicator {
        InputIndicator::Valid => " ✓",
        InputIndicator::Error => " ✗",
        InputIndicator::Neutral => "",
    };
    if view.input.is_empty() {
        human.push("Website URL: (empty)".to_string());
    } else {
        human.push(format!("Website URL: {}{marker}", view.input));
    }
    if let Some(status) = view.status {
        human.push(format!("  {status}"));
    }

    human.push(format!("QR Color: {}", view.color_label));
    human.push(format!(
        "Generate QR: {}",
        if view.generate_enabled { "enabled" } else { "disabled" }
    ));

    match view.finalized_url.as_deref() {
        Some(url) => {
            human.push(format!("Preview: {url}"));
            if view.download_visible {
                human.push("Download QR: available".to_string());
            }
        }
        None => human.push("Your premium QR preview will appear here".to_string()),
    }

    RenderedView { json, human }
}

/// Produce a structured JSON representation of the view.
pub fn view_value(view: &View) -> Value {
    json!({
        "input": view.input,
        "indicator": view.indicator,
        "status": view.status,
        "generate_enabled": view.generate_enabled,
        "download_visible": view.download_visible,
        "color": view.color,
        "color_label": view.color_label,
        "finalized_url": view.finalized_url,
        "phase": phase_label(view.phase),
    })
}

/// One-line description of an event outcome.
pub fn outcome_line(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Updated => "Updated".to_string(),
        Outcome::Generated { url } => format!("Generated QR code for {url}"),
        Outcome::GenerateIgnored => "Enter a valid website URL first".to_string(),
        Outcome::Downloaded { path } => format!("Saved {}", path.display()),
        Outcome::Reset => "Reset".to_string(),
    }
}

/// Structured form of an event outcome.
pub fn outcome_value(outcome: &Outcome) -> Value {
    match outcome {
        Outcome::Updated => json!({ "outcome": "updated" }),
        Outcome::Generated { url } => json!({ "outcome": "generated", "url": url }),
        Outcome::GenerateIgnored => json!({ "outcome": "generate_ignored" }),
        Outcome::Downloaded { path } => {
            json!({ "outcome": "downloaded", "path": path.display().to_string() })
        }
        Outcome::Reset => json!({ "outcome": "reset" }),
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Empty => "empty",
        Phase::Invalid => "invalid",
        Phase::Valid => "valid",
        Phase::Generated => "generated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::QrGenerator;
    use std::path::PathBuf;

    #[test]
    fn test_empty_view_shows_placeholder() {
        let rendered = render_view(&QrGenerator::default().view());
        assert_eq!(rendered.human[0], "Website URL: (empty)");
        assert!(rendered.human.contains(&"QR Color: #020617".to_string()));
        assert!(rendered.human.contains(&"Generate QR: disabled".to_string()));
        assert_eq!(
            rendered.human.last().map(String::as_str),
            Some("Your premium QR preview will appear here")
        );
        assert_eq!(rendered.json["phase"], "empty");
        assert_eq!(rendered.json["status"], Value::Null);
    }

    #[test]
    fn test_generated_view_lists_preview_and_download() {
        let mut generator = QrGenerator::default();
        generator.input("example.com");
        generator.set_color("#1e40af");
        generator.generate().unwrap();

        let rendered = render_view(&generator.view());
        assert_eq!(rendered.human[0], "Website URL: example.com ✓");
        assert_eq!(rendered.human[1], "  URL is valid and ready");
        assert!(rendered.human.contains(&"QR Color: #1E40AF".to_string()));
        assert!(rendered.human.contains(&"Preview: https://example.com".to_string()));
        assert!(rendered.human.contains(&"Download QR: available".to_string()));
        assert_eq!(rendered.json["finalized_url"], "https://example.com");
        assert_eq!(rendered.json["indicator"], "valid");
        assert_eq!(rendered.json["phase"], "generated");
    }

    #[test]
    fn test_outcomes_render_both_ways() {
        let outcome = Outcome::Downloaded {
            path: PathBuf::from("out/premium-qr.png"),
        };
        assert_eq!(outcome_line(&outcome), "Saved out/premium-qr.png");
        assert_eq!(outcome_value(&outcome)["path"], "out/premium-qr.png");
        assert_eq!(outcome_value(&Outcome::GenerateIgnored)["outcome"], "generate_ignored");
    }
}
