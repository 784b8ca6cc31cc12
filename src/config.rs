use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::cleaner::RowPolicy;
use crate::processing::statistics::CombineRule;
use crate::state::theme::Theme;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "ANGLEPLOT_CONFIG";
/// Looked up in the working directory when `ANGLEPLOT_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "angleplot.json";

pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<f32> = 8.0..=24.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Startup defaults for the session. Nothing is written back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub row_policy: RowPolicy,
    pub combine_rule: CombineRule,
    pub font_size: f32,
    pub y_axis_label: String,
    pub output_name: String,
    /// Round mean and std dev to two decimals in the spreadsheet export.
    pub round_export: bool,
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            row_policy: RowPolicy::default(),
            combine_rule: CombineRule::default(),
            font_size: 15.0,
            y_axis_label: "Contact angle (\u{00B0})".to_string(),
            output_name: "results".to_string(),
            round_export: false,
            theme: Theme::default(),
        }
    }
}

impl AppConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AppConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.font_size = config
            .font_size
            .clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end());
        Ok(config)
    }

    /// Load the config named by `ANGLEPLOT_CONFIG`, else `angleplot.json`
    /// if present. Falls back to defaults on any problem.
    pub fn load() -> Self {
        let (path, explicit) = match std::env::var_os(CONFIG_ENV) {
            Some(p) => (PathBuf::from(p), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !explicit && !path.exists() {
            return Self::default();
        }

        match Self::from_path(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }
}
