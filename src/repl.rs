//! Line-oriented event loop driving a [`QrGenerator`]
//!
//! Each line is one user action. Lines are read asynchronously, but every
//! action is applied synchronously before the next line is read.

use crate::error::{Error, Result};
use crate::export::SaveTarget;
use crate::output::{outcome_line, outcome_value, render_view, view_value};
use crate::qr::QrDecoder;
use crate::session::{Event, Outcome, QrGenerator};
use serde_json::json;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &[&str] = &[
    "Commands:",
    "  type <text>     set the website URL field (alias: url)",
    "  color <value>   set the QR color, e.g. #1e40af",
    "  generate        generate the QR code",
    "  download        save the displayed QR code as PNG",
    "  reset           clear everything",
    "  show            print the current state",
    "  preview         draw the displayed QR code in the terminal",
    "  help            show this help",
    "  quit            leave",
];

/// Presentation switches for the loop
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplOptions {
    /// Emit one JSON document per action instead of text
    pub json: bool,
    /// Decode every generated/downloaded surface to confirm it scans
    pub verify: bool,
}

/// Parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Widget event
    Event(Event),
    /// Print the current view
    Show,
    /// Print the terminal preview
    Preview,
    /// Print help
    Help,
    /// Stop the loop
    Quit,
    /// Blank line
    Nothing,
}

/// Parse one input line.
///
/// The command word ends at the first whitespace character. Text after it is
/// taken verbatim for `type` so surrounding spaces reach the validator.
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.trim_start().split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line.trim(), ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => Command::Nothing,
        "type" | "url" => Command::Event(Event::Input(rest.to_string())),
        "color" | "colour" => Command::Event(Event::Color(rest.trim().to_string())),
        "generate" => Command::Event(Event::Generate),
        "download" => Command::Event(Event::Download),
        "reset" => Command::Event(Event::Reset),
        "show" => Command::Show,
        "preview" => Command::Preview,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{other}', try 'help'")),
    };
    Ok(command)
}

/// Run the loop until `quit` or end of input.
///
/// Per-action failures are reported on `out` and the loop continues; only
/// I/O errors on `reader`/`out` end it early.
pub async fn run<R, W>(
    generator: &mut QrGenerator,
    target: &dyn SaveTarget,
    reader: R,
    out: &mut W,
    options: ReplOptions,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let decoder = QrDecoder::new();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                report_error(out, options, &message)?;
                continue;
            }
        };

        match command {
            Command::Nothing => {}
            Command::Quit => break,
            Command::Help => {
                for line in HELP {
                    writeln!(out, "{line}")?;
                }
            }
            Command::Show => print_view(out, generator, options, None)?,
            Command::Preview => match generator.terminal_preview() {
                Ok(Some(preview)) => writeln!(out, "{preview}")?,
                Ok(None) => report_error(out, options, &Error::NothingToExport.to_string())?,
                Err(err) => report_error(out, options, &err.to_string())?,
            },
            Command::Event(event) => match generator.apply(event, target) {
                Ok(outcome) => {
                    if options.verify {
                        if let Err(err) = verify_outcome(generator, &decoder, &outcome) {
                            tracing::warn!(error = %err, "Scan verification failed");
                            report_error(out, options, &err.to_string())?;
                        }
                    }
                    print_view(out, generator, options, Some(&outcome))?;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Action failed");
                    report_error(out, options, &err.to_string())?;
                }
            },
        }
        out.flush()?;
    }

    Ok(())
}

/// Decode the displayed surface after a generate/download and compare it to the encoded URL.
pub fn verify_outcome(
    generator: &QrGenerator,
    decoder: &QrDecoder,
    outcome: &Outcome,
) -> Result<()> {
    if !matches!(outcome, Outcome::Generated { .. } | Outcome::Downloaded { .. }) {
        return Ok(());
    }

    let Some(url) = generator.view().finalized_url else {
        return Ok(());
    };
    let surface = generator.surface()?.ok_or(Error::NothingToExport)?;
    decoder.verify(&surface, &url)
}

fn print_view<W: Write>(
    out: &mut W,
    generator: &QrGenerator,
    options: ReplOptions,
    outcome: Option<&Outcome>,
) -> Result<()> {
    let view = generator.view();
    if options.json {
        let payload = json!({
            "outcome": outcome.map(outcome_value),
            "view": view_value(&view),
        });
        writeln!(out, "{}", serde_json::to_string(&payload)?)?;
    } else {
        if let Some(outcome) = outcome {
            writeln!(out, "{}", outcome_line(outcome))?;
        }
        for line in render_view(&view).human {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

fn report_error<W: Write>(out: &mut W, options: ReplOptions, message: &str) -> Result<()> {
    if options.json {
        writeln!(out, "{}", serde_json::to_string(&json!({ "error": message }))?)?;
    } else {
        writeln!(out, "Error: {message}")?;
    }
    Ok(())
}
