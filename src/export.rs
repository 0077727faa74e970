//! PNG export of rendered surfaces
//!
//! Saving is abstracted behind [`SaveTarget`] so hosts decide where bytes end up.

use crate::error::{Error, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

/// File name suggested for every download.
pub const DEFAULT_FILE_NAME: &str = "premium-qr.png";

/// Host capability: save bytes under a file name.
pub trait SaveTarget {
    /// Persist `bytes` as `file_name`, returning where they went.
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves files into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    /// Target writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory files are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for DirectoryTarget {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create directory {}: {e}", self.dir.display()),
            ))
        })?;

        let path = self.dir.join(file_name);
        fs::write(&path, bytes).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write {}: {e}", path.display()),
            ))
        })?;
        Ok(path)
    }
}

/// Encodes surfaces as PNG and hands them to a [`SaveTarget`]
#[derive(Debug, Clone)]
pub struct Exporter {
    file_name: String,
}

impl Exporter {
    /// Exporter using `file_name` for every download.
    ///
    /// Only the final path component is kept.
    pub fn new(file_name: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into();
        let bare = Path::new(&file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::Config(format!("Invalid export file name '{file_name}'")))?;

        Ok(Self {
            file_name: bare.to_string(),
        })
    }

    /// File name used for downloads.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Lossless PNG encoding of `surface`.
    pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            surface.as_raw(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(bytes)
    }

    /// Encode `surface` and save it through `target`.
    pub fn export(&self, surface: &RgbaImage, target: &dyn SaveTarget) -> Result<PathBuf> {
        let bytes = Self::encode_png(surface)?;
        let path = target.save(&self.file_name, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Exported QR code");
        Ok(path)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}
