//! Light/dark display preference
//!
//! Kept as a single boolean under a well-known key in a small JSON file.
//! When nothing is stored yet, the terminal's reported colour scheme decides.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Key the preference is stored under
pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Preferences I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preferences file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Preferences file must contain a JSON object")]
    NotAnObject,
}

/// File-backed preference storage
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!(path = %path.display(), "PreferenceStore::open: called");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored value, if any
    pub fn stored_dark(&self) -> Result<Option<bool>, PrefsError> {
        let map = self.read()?;
        Ok(match map.get(DARK_MODE_KEY) {
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::String(s)) => Some(s == "true"),
            _ => None,
        })
    }

    /// Stored value, falling back to the terminal's colour scheme
    pub fn is_dark(&self) -> Result<bool, PrefsError> {
        Ok(self.stored_dark()?.unwrap_or_else(system_prefers_dark))
    }

    pub fn set_dark(&self, dark: bool) -> Result<(), PrefsError> {
        debug!(dark, "PreferenceStore::set_dark: called");
        let mut map = self.read()?;
        map.insert(DARK_MODE_KEY.to_string(), Value::Bool(dark));
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(map))?)?;
        Ok(())
    }

    /// Flip the preference and return the new value
    pub fn toggle(&self) -> Result<bool, PrefsError> {
        let dark = !self.is_dark()?;
        self.set_dark(dark)?;
        Ok(dark)
    }

    fn read(&self) -> Result<Map<String, Value>, PrefsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(PrefsError::NotAnObject),
        }
    }
}

/// Colour scheme reported by the terminal through `COLORFGBG`
pub fn system_prefers_dark() -> bool {
    scheme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()).unwrap_or(false)
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); dark backgrounds are
/// the low ANSI colours other than white-ish 7
fn scheme_from_colorfgbg(value: Option<&str>) -> Option<bool> {
    let bg = value?.rsplit(';').next()?.trim().parse::<u8>().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}
