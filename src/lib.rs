//! qrcraft - branded website QR code generator
//!
//! A user types a website address, it is validated and normalized, a QR code
//! encoding it is rendered in a chosen foreground color with a centered logo,
//! and the result can be saved as a PNG.
//!
//! # Features
//!
//! - **Validation**: purely syntactic URL checks with `https://` normalization
//! - **Widget state**: explicit state machine for input, generate and reset
//! - **Rendering**: fixed-size colored raster with an excavated logo region
//! - **Export**: lossless PNG through a pluggable save target
//!
//! # Example
//!
//! ```no_run
//! use qrcraft::{DirectoryTarget, QrGenerator};
//!
//! fn main() -> qrcraft::Result<()> {
//!     let mut generator = QrGenerator::default();
//!     generator.input("example.com");
//!     generator.set_color("#1e40af");
//!     generator.generate()?;
//!
//!     let path = generator.download(&DirectoryTarget::new("."))?;
//!     println!("Saved {}", path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod output;
pub mod qr;
pub mod repl;
pub mod session;
pub mod state;
pub mod validate;

// Re-exports for convenience
pub use error::{Error, Result};

pub use color::{DEFAULT_QR_COLOR, QrColor};
pub use config::{ExportOptions, LogRotation, LoggingOptions, QrcraftConfig, RenderOptions};
pub use export::{DEFAULT_FILE_NAME, DirectoryTarget, Exporter, SaveTarget};
pub use qr::{LogoSettings, QrDecoder, QrRenderer, RenderSettings};
pub use session::{Event, Outcome, QrGenerator, View};
pub use state::{GeneratorState, Phase};
pub use validate::{InputIndicator, ValidationResult, normalize, validate};
