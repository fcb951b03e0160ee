//! Configuration file support for mouse-trajectory.
//!
//! Settings are read from `~/.config/mouse-trajectory/config.toml` unless a
//! path is given on the command line. A missing file means defaults.

pub mod types;

pub use types::{CanvasConfig, RecordingConfig};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure.
///
/// # Example TOML
/// ```toml
/// [recording]
/// frequency_hz = 100.0
/// output_directory = "~/trajectories"
/// filename_template = "trajectory_%Y-%m-%d_%H%M%S"
///
/// [canvas]
/// width = 800
/// height = 600
/// stroke_thickness = 4
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub recording: RecordingConfig,

    #[serde(default)]
    pub canvas: CanvasConfig,
}

impl Config {
    /// Clamps out-of-range values, logging a warning for each.
    ///
    /// Validated ranges:
    /// - `frequency_hz`: 1.0 - 1000.0
    /// - `width`, `height`: 16 - 8192
    /// - `stroke_thickness`: 1 - 20
    fn validate_and_clamp(&mut self) {
        let frequency = self.recording.frequency_hz;
        if !frequency.is_finite() {
            warn!("Invalid frequency_hz {}, falling back to 50.0", frequency);
            self.recording.frequency_hz = 50.0;
        } else if !(1.0..=1000.0).contains(&frequency) {
            warn!(
                "Invalid frequency_hz {:.1}, clamping to 1.0-1000.0 range",
                frequency
            );
            self.recording.frequency_hz = frequency.clamp(1.0, 1000.0);
        }

        for (name, value) in [
            ("width", &mut self.canvas.width),
            ("height", &mut self.canvas.height),
        ] {
            if !(16..=8192).contains(&*value) {
                warn!("Invalid canvas {} {}, clamping to 16-8192 range", name, value);
                *value = (*value).clamp(16, 8192);
            }
        }

        if !(1..=20).contains(&self.canvas.stroke_thickness) {
            warn!(
                "Invalid stroke_thickness {}, clamping to 1-20 range",
                self.canvas.stroke_thickness
            );
            self.canvas.stroke_thickness = self.canvas.stroke_thickness.clamp(1, 20);
        }

        if self.recording.filename_template.trim().is_empty() {
            warn!("Empty filename_template, falling back to default");
            self.recording.filename_template = RecordingConfig::default().filename_template;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("mouse-trajectory");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from `config_path`, or returns defaults if no file
    /// exists there.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains
    /// invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Writes the configuration to `config_path`, creating parent directories.
    pub fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Writes a default configuration file to `config_path`.
    ///
    /// # Errors
    /// Returns an error if a file already exists there or it cannot be written.
    pub fn create_default_file(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        Self::default().save(config_path)?;
        info!("Created default config at {}", config_path.display());
        Ok(())
    }
}
