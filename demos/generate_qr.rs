//! Generate branded QR codes and save them as PNG files
//!
//! Usage: cargo run --example generate_qr

use qrcraft::{DirectoryTarget, Exporter, LogoSettings, QrGenerator, QrRenderer, RenderSettings};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let target = DirectoryTarget::new("qr-output");

    // Default widget: dark slate on white, no logo
    let mut generator = QrGenerator::default();
    generator.input("rust-lang.org");
    generator.generate()?;
    let path = generator.download(&target)?;
    println!("✓ QR code for https://rust-lang.org saved to {}", path.display());

    // Branded variant: blue foreground, centered logo, custom file name
    let settings = RenderSettings {
        size: 480,
        logo: Some(LogoSettings {
            width: 96,
            height: 96,
            ..LogoSettings::new("logo.jpg")
        }),
        ..RenderSettings::default()
    };
    let mut branded = QrGenerator::new(
        QrRenderer::new(settings),
        Exporter::new("branded-qr.png")?,
        "#1e40af".into(),
    );
    branded.input("http://example.com/launch");
    branded.generate()?;
    let path = branded.download(&target)?;
    println!("✓ Branded QR code saved to {}", path.display());

    if let Some(preview) = branded.terminal_preview()? {
        println!("{preview}");
    }

    Ok(())
}
