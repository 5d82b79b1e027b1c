use super::run::{RunConfig, DEFAULT_THRESHOLD, DEFAULT_WINDOW_SIZE, DEFAULT_WORKER_COUNT};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults read from `config.toml`. Command line flags override every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default)]
    pub mask: bool,
    #[serde(default)]
    pub in_flight: Option<usize>,
    #[serde(default = "default_quality_offset")]
    pub quality_offset: u8,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_threads() -> usize {
    DEFAULT_WORKER_COUNT
}

fn default_quality_offset() -> u8 {
    33
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            window_size: default_window_size(),
            threads: default_threads(),
            mask: false,
            in_flight: None,
            quality_offset: default_quality_offset(),
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "qualmask", "qualmask")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads the per-user settings file, falling back to defaults when it is missing or
    /// unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Settings::default();
        };
        if !path.exists() {
            return Settings::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Ignoring settings file {}: {:#}", path.display(), e);
                Settings::default()
            }
        }
    }

    /// Loads an explicitly named settings file. Errors are fatal here.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_path().context("No configuration directory available")?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn to_run_config(&self) -> RunConfig {
        RunConfig {
            threshold: self.threshold,
            window_size: self.window_size,
            worker_count: self.threads,
            mask_mode: self.mask,
            in_flight: self.in_flight,
        }
    }
}
