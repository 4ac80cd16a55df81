//! Engine settings.
//!
//! Every field has a default, so an empty TOML document is valid. Unknown
//! fields are ignored.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SelectionSettings {
    /// Normal mode requires every selection to cover at least one grapheme.
    #[serde(default = "SelectionSettings::default_enforce_non_empty")]
    pub enforce_non_empty_in_normal: bool,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            enforce_non_empty_in_normal: Self::default_enforce_non_empty(),
        }
    }
}

impl SelectionSettings {
    const fn default_enforce_non_empty() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct HistorySettings {
    /// Per-document entry cap; absent means unbounded.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub selections: SelectionSettings,
    #[serde(default)]
    pub history: HistorySettings,
}

impl Settings {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&raw)?;
        info!(target: "config", path = %path.display(), "settings_loaded");
        Ok(settings)
    }
}
