//! qrcraft runtime configuration handling

use crate::color::{BACKGROUND_COLOR, DEFAULT_QR_COLOR, QrColor};
use crate::error::{Error, Result};
use crate::export::DEFAULT_FILE_NAME;
use crate::qr::{LogoSettings, RenderSettings, ecc_label, parse_ecc_level};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrcraftConfig {
    /// QR rendering options
    pub render: RenderOptions,
    /// Download options
    pub export: ExportOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl QrcraftConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qrcraft.toml / qrcraft.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrcraft.toml", "qrcraft.yaml", "qrcraft.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrcraft");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(&|key: &str| env::var(key).ok());
    }

    /// Apply `QRCRAFT_*` overrides resolved through `lookup`.
    fn apply_overrides_from<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.render.apply_env_overrides(lookup);
        self.export.apply_env_overrides(lookup);
        self.logging.apply_env_overrides(lookup);
    }

    /// Produce resolved renderer settings.
    pub fn render_settings(&self) -> Result<RenderSettings> {
        self.render.to_render_settings()
    }
}

/// User-facing rendering options, resolved into [`RenderSettings`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Edge length of the rendered code in pixels
    pub size: u32,
    /// Initial foreground color, also restored on reset
    pub color: String,
    /// Background color
    pub background: String,
    /// Error correction level (`L`, `M`, `Q`, `H`)
    pub ecc: String,
    /// Logo drawn over the center; `None` disables the overlay
    pub logo: Option<PathBuf>,
    /// Logo width in pixels
    pub logo_width: u32,
    /// Logo height in pixels
    pub logo_height: u32,
    /// Clear modules under the logo
    pub excavate: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: 240,
            color: DEFAULT_QR_COLOR.to_string(),
            background: BACKGROUND_COLOR.to_string(),
            ecc: "H".to_string(),
            logo: Some(PathBuf::from("logo.jpg")),
            logo_width: 48,
            logo_height: 48,
            excavate: true,
        }
    }
}

impl RenderOptions {
    fn apply_env_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) {
        if let Some(size) = lookup("QRCRAFT_SIZE") {
            match size.trim().parse::<u32>() {
                Ok(parsed) => self.size = parsed,
                Err(_) => tracing::warn!(value = %size, "Ignoring invalid QRCRAFT_SIZE"),
            }
        }
        if let Some(color) = lookup("QRCRAFT_COLOR") {
            self.color = color;
        }
        if let Some(ecc) = lookup("QRCRAFT_ECC") {
            self.ecc = ecc;
        }
        if let Some(logo) = lookup("QRCRAFT_LOGO") {
            if logo.trim().is_empty() {
                self.logo = None;
            } else {
                self.logo = Some(PathBuf::from(logo));
            }
        }
    }

    /// Initial (and reset) foreground color.
    pub fn default_color(&self) -> QrColor {
        QrColor::new(self.color.clone())
    }

    /// Validate and convert into renderer settings.
    pub fn to_render_settings(&self) -> Result<RenderSettings> {
        if self.size == 0 {
            return Err(Error::Config("Render size must be at least 1 pixel".to_string()));
        }

        let ecc_level = parse_ecc_level(&self.ecc).ok_or_else(|| {
            Error::Config(format!(
                "Unknown error correction level '{}'. Use L, M, Q, or H",
                self.ecc
            ))
        })?;

        let logo = self.logo.as_ref().map(|path| LogoSettings {
            path: path.clone(),
            width: self.logo_width.max(1),
            height: self.logo_height.max(1),
            excavate: self.excavate,
        });

        let settings = RenderSettings {
            size: self.size,
            background: self.background.clone(),
            ecc_level,
            logo,
        };
        if settings.excavation_outweighs_ecc() {
            tracing::warn!(
                ecc = ecc_label(ecc_level),
                "Excavated logo on a low error-correction symbol; codes may not scan, use Q or H"
            );
        }
        Ok(settings)
    }
}

/// Where and under which name downloads are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Directory receiving downloads
    pub output_dir: PathBuf,
    /// Download file name
    pub file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl ExportOptions {
    fn apply_env_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) {
        if let Some(dir) = lookup("QRCRAFT_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup("QRCRAFT_FILE_NAME") {
            self.file_name = name;
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRCRAFT_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    fn apply_env_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) {
        if let Some(level) = lookup("QRCRAFT_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(file) = lookup("QRCRAFT_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(color) = lookup("QRCRAFT_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
        if let Some(rotation) = lookup("QRCRAFT_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrcode::EcLevel;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("qrcraft-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_match_widget() {
        let config = QrcraftConfig::default();
        let settings = config.render_settings().unwrap();
        assert_eq!(settings.size, 240);
        assert_eq!(settings.background, "#ffffff");
        assert_eq!(settings.ecc_level, EcLevel::H);
        let logo = settings.logo.unwrap();
        assert_eq!((logo.width, logo.height, logo.excavate), (48, 48, true));
        assert_eq!(config.render.default_color().as_str(), "#020617");
        assert_eq!(config.export.file_name, "premium-qr.png");
    }

    #[test]
    fn test_loads_toml() {
        let path = write_temp(
            "qrcraft.toml",
            r##"
[render]
size = 512
color = "#1e40af"
ecc = "q"
logo = "brand/logo.png"

[export]
output_dir = "out"

[logging]
level = "debug"
rotation = "daily"
"##,
        );

        let config = QrcraftConfig::from_file(&path).unwrap();
        assert_eq!(config.render.size, 512);
        assert_eq!(config.render.color, "#1e40af");
        assert_eq!(config.render.logo_width, 48);
        assert_eq!(config.export.output_dir, PathBuf::from("out"));
        assert_eq!(config.export.file_name, "premium-qr.png");
        assert_eq!(config.logging.rotation, Some(LogRotation::Daily));

        let settings = config.render_settings().unwrap();
        assert_eq!(settings.ecc_level, EcLevel::Q);
        assert_eq!(settings.logo.unwrap().path, PathBuf::from("brand/logo.png"));
    }

    #[test]
    fn test_loads_yaml() {
        let path = write_temp(
            "qrcraft.yaml",
            "render:\n  size: 300\n  excavate: false\nexport:\n  file_name: brand.png\n",
        );

        let config = QrcraftConfig::from_file(&path).unwrap();
        assert_eq!(config.render.size, 300);
        assert!(!config.render.excavate);
        assert_eq!(config.export.file_name, "brand.png");
    }

    #[test]
    fn test_rejects_unknown_format() {
        let path = write_temp("qrcraft.ini", "size=1");
        let err = QrcraftConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("Unsupported config format")));
    }

    #[test]
    fn test_rejects_bad_render_options() {
        let mut options = RenderOptions::default();
        options.ecc = "Z".to_string();
        assert!(options.to_render_settings().is_err());

        let mut options = RenderOptions::default();
        options.size = 0;
        assert!(options.to_render_settings().is_err());
    }

    #[test]
    fn test_parses_rotation_case_insensitively() {
        assert_eq!(LogRotation::from_str("HOURLY"), Some(LogRotation::Hourly));
        assert_eq!(LogRotation::from_str("weekly"), None);
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn test_env_overrides_every_section() {
        let mut config = QrcraftConfig::default();
        config.apply_overrides_from(&env_from(&[
            ("QRCRAFT_SIZE", "480"),
            ("QRCRAFT_COLOR", "#1e40af"),
            ("QRCRAFT_ECC", "q"),
            ("QRCRAFT_LOGO", "brand/mark.png"),
            ("QRCRAFT_OUTPUT_DIR", "downloads"),
            ("QRCRAFT_FILE_NAME", "brand.png"),
            ("QRCRAFT_LOG_LEVEL", "qrcraft=debug"),
            ("QRCRAFT_LOG_FILE", "logs/qrcraft.log"),
            ("QRCRAFT_LOG_COLOR", "off"),
            ("QRCRAFT_LOG_ROTATION", "Hourly"),
        ]));

        assert_eq!(config.render.size, 480);
        assert_eq!(config.render.default_color().as_str(), "#1e40af");
        assert_eq!(config.export.output_dir, PathBuf::from("downloads"));
        assert_eq!(config.export.file_name, "brand.png");
        assert_eq!(config.logging.level, "qrcraft=debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("logs/qrcraft.log")));
        assert!(!config.logging.color);
        assert_eq!(config.logging.rotation, Some(LogRotation::Hourly));

        let settings = config.render_settings().unwrap();
        assert_eq!(settings.ecc_level, EcLevel::Q);
        assert_eq!(settings.logo.unwrap().path, PathBuf::from("brand/mark.png"));
    }

    #[test]
    fn test_empty_logo_env_disables_overlay_and_excavation() {
        let mut config = QrcraftConfig::default();
        config.apply_overrides_from(&env_from(&[("QRCRAFT_LOGO", "  ")]));

        let settings = config.render_settings().unwrap();
        assert_eq!(settings.logo, None);
        assert!(crate::qr::QrRenderer::new(settings).excavation(25).is_none());
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = QrcraftConfig::default();
        config.apply_overrides_from(&env_from(&[
            ("QRCRAFT_SIZE", "huge"),
            ("QRCRAFT_LOG_COLOR", "maybe"),
            ("QRCRAFT_LOG_ROTATION", "weekly"),
        ]));

        assert_eq!(config.render.size, 240);
        assert!(config.logging.color);
        assert_eq!(config.logging.rotation, None);
    }

    #[test]
    fn test_log_color_env_is_case_insensitive() {
        for (value, expected) in [("FALSE", false), ("Off", false), ("TRUE", true), ("On", true)] {
            let mut config = QrcraftConfig::default();
            config.logging.color = !expected;
            config.apply_overrides_from(&env_from(&[("QRCRAFT_LOG_COLOR", value)]));
            assert_eq!(config.logging.color, expected, "{value}");
        }
    }

    #[test]
    fn test_low_ecc_with_excavated_logo_still_resolves() {
        let mut options = RenderOptions::default();
        options.ecc = "L".to_string();

        let settings = options.to_render_settings().unwrap();
        assert_eq!(settings.ecc_level, EcLevel::L);
        assert!(settings.excavation_outweighs_ecc());
    }
}
