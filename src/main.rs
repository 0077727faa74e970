//! qrcraft command-line entrypoint

use clap::Parser;
use qrcraft::output::{outcome_line, outcome_value, render_view, view_value};
use qrcraft::qr::parse_ecc_level;
use qrcraft::repl::{self, ReplOptions, verify_outcome};
use qrcraft::{
    DirectoryTarget, Error, Event, Outcome, QrDecoder, QrGenerator, QrcraftConfig, Result, logging,
};
use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "qrcraft",
    version,
    about = "Branded website QR code generator"
)]
struct Cli {
    /// Website URL to encode. Without it an interactive session is started on stdin.
    url: Option<String>,

    /// Optional configuration file (toml/yaml). Defaults to qrcraft.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// QR foreground color (e.g. #1e40af); also restored on reset
    #[arg(long, value_name = "HEX")]
    color: Option<String>,

    /// Directory the PNG is written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// File name of the PNG
    #[arg(long, value_name = "NAME")]
    file_name: Option<String>,

    /// Edge length of the rendered code in pixels
    #[arg(long, value_name = "PX")]
    size: Option<u32>,

    /// Error correction level (L, M, Q, H)
    #[arg(long, value_name = "LEVEL")]
    ecc: Option<String>,

    /// Logo image drawn over the center of the code
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Render without a logo overlay or excavation; takes precedence over --logo
    #[arg(long)]
    no_logo: bool,

    /// Output results as JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Draw the generated code in the terminal
    #[arg(long)]
    preview: bool,

    /// Decode the rendered code to confirm it scans back to the URL
    #[arg(long)]
    verify: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut QrcraftConfig) -> Result<()> {
        if let Some(ref color) = self.color {
            config.render.color = color.clone();
        }
        if let Some(ref dir) = self.output_dir {
            config.export.output_dir = dir.clone();
        }
        if let Some(ref name) = self.file_name {
            config.export.file_name = name.clone();
        }
        if let Some(size) = self.size {
            config.render.size = size;
        }
        if let Some(ref ecc) = self.ecc {
            parse_ecc_level(ecc)
                .ok_or_else(|| Error::Config(format!("Unknown error correction level '{ecc}'")))?;
            config.render.ecc = ecc.clone();
        }
        if let Some(ref logo) = self.logo {
            config.render.logo = Some(logo.clone());
        }
        if self.no_logo {
            config.render.logo = None;
        }
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = QrcraftConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config)?;

    logging::init(&config.logging)?;

    let mut generator = QrGenerator::from_config(&config)?;
    let target = DirectoryTarget::new(config.export.output_dir.clone());
    info!(
        output_dir = %target.dir().display(),
        file_name = generator.exporter().file_name(),
        logo = generator.renderer().has_logo(),
        "Starting qrcraft"
    );

    match cli.url.clone() {
        Some(url) => generate_once(&mut generator, &target, &cli, url),
        None => {
            let options = ReplOptions {
                json: cli.json,
                verify: cli.verify,
            };
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = io::stdout();
            if !cli.json {
                writeln!(stdout, "qrcraft interactive session, type 'help' for commands")?;
            }
            repl::run(&mut generator, &target, stdin, &mut stdout, options).await
        }
    }
}

fn generate_once(
    generator: &mut QrGenerator,
    target: &DirectoryTarget,
    cli: &Cli,
    url: String,
) -> Result<()> {
    generator.apply(Event::Input(url.clone()), target)?;

    let generated = generator.apply(Event::Generate, target)?;
    if generated == Outcome::GenerateIgnored {
        return Err(Error::InvalidUrl(url));
    }

    if cli.verify {
        verify_outcome(generator, &QrDecoder::new(), &generated)?;
        info!("Rendered code scans back to the encoded URL");
    }

    let downloaded = generator.apply(Event::Download, target)?;

    let mut stdout = io::stdout();
    if cli.json {
        let mut payload = json!({
            "generated": outcome_value(&generated),
            "downloaded": outcome_value(&downloaded),
            "view": view_value(&generator.view()),
            "verified": cli.verify,
        });
        if cli.preview {
            if let (Some(obj), Some(preview)) =
                (payload.as_object_mut(), generator.terminal_preview()?)
            {
                obj.insert("preview".to_string(), preview.into());
            }
        }
        writeln!(stdout, "{}", serde_json::to_string_pretty(&payload)?)?;
        return Ok(());
    }

    if cli.preview {
        if let Some(preview) = generator.terminal_preview()? {
            writeln!(stdout, "{preview}")?;
        }
    }
    writeln!(stdout, "{}", outcome_line(&generated))?;
    for line in render_view(&generator.view()).human {
        writeln!(stdout, "{line}")?;
    }
    writeln!(stdout, "{}", outcome_line(&downloaded))?;
    if cli.verify {
        writeln!(stdout, "Verified: code scans back to the encoded URL")?;
    }

    Ok(())
}
