//! Website URL normalization and syntactic validation
//!
//! Validation is purely syntactic: no DNS lookups or reachability checks are
//! ever performed. The same input always produces the same result.

use serde::Serialize;
use url::Url;

/// Message shown beneath the input whenever non-empty text fails validation.
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid website URL";

/// Message shown beneath the input once the text is a valid website URL.
pub const VALID_URL_MESSAGE: &str = "URL is valid and ready";

const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Outcome of validating the raw input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the input normalizes to an acceptable website URL
    pub valid: bool,
    /// User-facing error, present iff the input is non-empty and invalid
    pub error: Option<&'static str>,
}

impl ValidationResult {
    /// The untouched state of an empty field: not valid, but no error either.
    pub const fn neutral() -> Self {
        Self {
            valid: false,
            error: None,
        }
    }

    const fn accepted() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    const fn rejected() -> Self {
        Self {
            valid: false,
            error: Some(INVALID_URL_MESSAGE),
        }
    }

    /// Status line shown beneath the input, if any.
    pub fn status_message(&self) -> Option<&'static str> {
        match (self.valid, self.error) {
            (true, _) => Some(VALID_URL_MESSAGE),
            (false, error) => error,
        }
    }

    /// Visual indicator for the input field.
    pub fn indicator(&self) -> InputIndicator {
        if self.error.is_some() {
            InputIndicator::Error
        } else if self.valid {
            InputIndicator::Valid
        } else {
            InputIndicator::Neutral
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Field decoration derived from the current validation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputIndicator {
    /// Empty field, nothing to report
    Neutral,
    /// Non-empty text that is not a valid website URL
    Error,
    /// Valid website URL, ready to generate
    Valid,
}

/// Rewrite raw input into an absolute URL candidate with an explicit scheme.
///
/// Surrounding whitespace is trimmed and `https://` is prepended unless the
/// text already starts with `http://` or `https://` (case-sensitive).
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim_matches(is_field_whitespace);

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
    }
}

/// Whitespace and line terminators stripped from the URL field, as browsers
/// trim form text: unlike `char::is_whitespace` this includes U+FEFF and
/// excludes U+0085.
fn is_field_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0b}'
            | '\u{0c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Classify raw input as empty, invalid or valid.
pub fn validate(raw: &str) -> ValidationResult {
    if raw.is_empty() {
        return ValidationResult::neutral();
    }

    let candidate = normalize(raw);
    match Url::parse(&candidate) {
        Ok(parsed) => {
            if parsed.host_str().is_some_and(has_plausible_tld) {
                ValidationResult::accepted()
            } else {
                tracing::trace!(%candidate, "rejected host without a usable suffix");
                ValidationResult::rejected()
            }
        }
        Err(err) => {
            tracing::trace!(%candidate, error = %err, "rejected unparsable URL");
            ValidationResult::rejected()
        }
    }
}

/// Host must contain a `.` and the label after the last one needs 2+ characters.
fn has_plausible_tld(host: &str) -> bool {
    match host.rsplit_once('.') {
        Some((_, suffix)) => suffix.chars().count() >= 2,
        None => false,
    }
}
