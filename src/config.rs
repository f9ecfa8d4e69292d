//! Editor configuration
//!
//! Stored as pretty JSON in the platform config dir. Missing keys fall back
//! to defaults; a missing file is created on first run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{catalog, config};

/// Upper bound for catalog page sizes
const MAX_PAGE_SIZE: usize = 250;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// File simulating the remote validation object
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Product catalog served to the editor
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_window_width")]
    pub window_width: u16,
    #[serde(default = "default_window_height")]
    pub window_height: u16,
    #[serde(default = "default_product_page_size")]
    pub product_page_size: usize,
    #[serde(default = "default_variant_page_size")]
    pub variant_page_size: usize,
}

fn data_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(config::APP_DIR);
    path
}

fn default_store_path() -> PathBuf {
    data_dir().join(config::STORE_FILENAME)
}

fn default_catalog_path() -> PathBuf {
    data_dir().join(config::CATALOG_FILENAME)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_window_width() -> u16 {
    760
}

fn default_window_height() -> u16 {
    640
}

fn default_product_page_size() -> usize {
    catalog::PRODUCT_PAGE_SIZE
}

fn default_variant_page_size() -> usize {
    catalog::VARIANT_PAGE_SIZE
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            catalog_path: default_catalog_path(),
            log_level: default_log_level(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            product_page_size: default_product_page_size(),
            variant_page_size: default_variant_page_size(),
        }
    }
}

impl EditorConfig {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::FILENAME);
        path
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load from `path`, writing a default file if none exists
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, creating default config");
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        config.validate_and_clamp();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Page sizes must stay within 1..=250
    fn validate_and_clamp(&mut self) {
        for (name, size, default) in [
            ("product_page_size", &mut self.product_page_size, default_product_page_size()),
            ("variant_page_size", &mut self.variant_page_size, default_variant_page_size()),
        ] {
            if *size == 0 {
                warn!(key = name, using = default, "Page size of 0, using default");
                *size = default;
            } else if *size > MAX_PAGE_SIZE {
                warn!(key = name, size = *size, max = MAX_PAGE_SIZE, "Page size exceeds maximum, clamping");
                *size = MAX_PAGE_SIZE;
            }
        }
    }
}
