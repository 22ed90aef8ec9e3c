use crate::canvas::Backdrop;
use crate::error::ConfigResult;
use crate::export::ExportConfig;
use crate::magnifier::MagnifierConfig;
use crate::stroke::Brush;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Editor settings. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Brush used when the editor opens
    pub brush: Brush,
    pub magnifier: MagnifierConfig,
    pub export: ExportConfig,
    /// What the on-screen canvas shows behind unmasked pixels
    pub canvas_backdrop: Backdrop,
    /// What exported images show behind unmasked pixels
    pub export_backdrop: Backdrop,
    /// Root of the local image store
    pub cache_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            brush: Brush::default(),
            magnifier: MagnifierConfig::default(),
            export: ExportConfig::default(),
            canvas_backdrop: Backdrop::WHITE,
            export_backdrop: Backdrop::Transparent,
            cache_dir: default_cache_dir(),
        }
    }
}

/// Platform cache directory, or the temp dir where the platform has none
pub fn default_cache_dir() -> PathBuf {
    dirs_next::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("cutout_editor")
}

impl EditorConfig {
    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load `path` if given, logging and falling back to defaults on failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Ignoring config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }
}
