//! Editor preferences and settings.
//!
//! Persistent settings that survive editor restarts, stored as TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PreferencesError;

/// Snap settings for manipulation previews.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Enable snap
    pub enabled: bool,
    /// Translation snap value (units)
    pub translate: f32,
    /// Rotation snap value (degrees)
    pub rotate_degrees: f32,
    /// Scale snap value (multiplier)
    pub scale: f32,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            translate: 0.5,
            rotate_degrees: 15.0,
            scale: 0.1,
        }
    }
}

/// Editor preferences and settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Maximum undo depth; 0 keeps every command
    pub history_limit: usize,

    /// Snapping for manipulation tools
    pub snap: SnapSettings,

    /// Selection extents below this are treated as flat on that axis
    pub min_group_extent: f32,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            history_limit: 100,
            snap: SnapSettings::default(),
            min_group_extent: 1e-4,
        }
    }
}

impl EditorPreferences {
    /// Undo depth limit, `None` when unlimited
    pub fn history_limit(&self) -> Option<usize> {
        (self.history_limit > 0).then_some(self.history_limit)
    }

    /// Parse preferences from TOML. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, PreferencesError> {
        let preferences: Self = toml::from_str(content)?;
        preferences.validate()?;
        Ok(preferences)
    }

    pub fn to_toml_string(&self) -> Result<String, PreferencesError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load preferences from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let preferences = Self::from_toml_str(&content)?;
        log::info!("Loaded preferences from {:?}", path);
        Ok(preferences)
    }

    /// Load preferences, falling back to defaults if the file is missing or bad.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(preferences) => preferences,
            Err(PreferencesError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring preferences at {:?}: {}", path.as_ref(), e);
                Self::default()
            }
        }
    }

    /// Save preferences to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PreferencesError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        log::info!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Get the default preferences path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("orbit_editor");
            p.push("preferences.toml");
            p
        })
    }

    pub fn validate(&self) -> Result<(), PreferencesError> {
        let steps = [
            ("snap.translate", self.snap.translate),
            ("snap.rotate_degrees", self.snap.rotate_degrees),
            ("snap.scale", self.snap.scale),
        ];
        for (name, value) in steps {
            if !(value.is_finite() && value > 0.0) {
                return Err(PreferencesError::Invalid(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if !(self.min_group_extent.is_finite() && self.min_group_extent >= 0.0) {
            return Err(PreferencesError::Invalid(format!(
                "min_group_extent must be non-negative, got {}",
                self.min_group_extent
            )));
        }
        Ok(())
    }
}
