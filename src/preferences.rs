//! Gallery view preferences and their key-value store.
//!
//! The preference lives under one key, [`PREFERENCE_KEY`], as a
//! slash-delimited string `"<view>/<grid size>/<table size>"`. Each segment
//! falls back to its default independently, so `"table//huge"` reads as
//! table view, medium grid, small table.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const PREFERENCE_KEY: &str = "GalleryUserPreference";

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("cannot read preferences {path}: {message}")]
    Read { path: String, message: String },
    #[error("cannot write preferences {path}: {message}")]
    Write { path: String, message: String },
    #[error("preferences file is corrupt: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryView {
    #[default]
    Grid,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailSize {
    Tiny,
    Small,
    Medium,
    Large,
}

impl GalleryView {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Table => "table",
        }
    }
}

impl FromStr for GalleryView {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "table" => Ok(Self::Table),
            _ => Err(()),
        }
    }
}

impl ThumbnailSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl FromStr for ThumbnailSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiny" => Ok(Self::Tiny),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPreferences {
    pub view: GalleryView,
    pub grid_size: ThumbnailSize,
    pub table_size: ThumbnailSize,
}

impl Default for GalleryPreferences {
    fn default() -> Self {
        Self {
            view: GalleryView::Grid,
            grid_size: ThumbnailSize::Medium,
            table_size: ThumbnailSize::Small,
        }
    }
}

impl GalleryPreferences {
    /// Lenient parse; never fails.
    pub fn parse(value: &str) -> Self {
        let defaults = Self::default();
        let mut parts = value.split('/');
        let mut next = || parts.next().unwrap_or("");
        Self {
            view: next().parse().unwrap_or(defaults.view),
            grid_size: next().parse().unwrap_or(defaults.grid_size),
            table_size: next().parse().unwrap_or(defaults.table_size),
        }
    }
}

impl fmt::Display for GalleryPreferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.view.as_str(),
            self.grid_size.as_str(),
            self.table_size.as_str()
        )
    }
}

/// Flat string key-value store persisted as a JSON object.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

/// `<data_local_dir>/mediagallery/preferences.json`
pub fn default_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_default()
        .join("mediagallery")
        .join("preferences.json")
}

impl PreferenceStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferencesError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| PreferencesError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(PreferencesError::Read {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set `key` and write the whole store back to disk.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), PreferencesError> {
        self.values.insert(key.to_string(), value.into());
        self.save()
    }

    fn save(&self) -> Result<(), PreferencesError> {
        let write_err = |message: String| PreferencesError::Write {
            path: self.path.display().to_string(),
            message,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| write_err(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| write_err(e.to_string()))
    }

    pub fn gallery_preferences(&self) -> GalleryPreferences {
        self.get(PREFERENCE_KEY)
            .map(GalleryPreferences::parse)
            .unwrap_or_default()
    }

    pub fn set_gallery_preferences(
        &mut self,
        prefs: GalleryPreferences,
    ) -> Result<(), PreferencesError> {
        tracing::debug!(value = %prefs, "saving gallery preferences");
        self.set(PREFERENCE_KEY, prefs.to_string())
    }
}
