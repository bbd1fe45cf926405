// SPDX-License-Identifier: GPL-3.0-or-later
//! Persisted local settings.
//!
//! User preferences (theme preference, selected palette, saved palettes)
//! are stored in a `local_settings.toml` file under the platform config
//! directory. The file carries a format version: versions older than the
//! supported minimum reset to defaults, newer versions load best-effort.
//! A corrupt file also resets to defaults; loading never panics and never
//! aborts the application.

use crate::defaults::{APP_NAME, SETTINGS_MIN_SUPPORTED_VERSION, SETTINGS_VERSION};
use crate::error::Result;
use crate::signal::ThemePreference;
use crate::theming::{ColorPair, PaletteSelection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "local_settings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalSettings {
    #[serde(default = "current_version")]
    pub version: u32,

    #[serde(default)]
    pub theme: ThemePreference,

    /// Why the file was last written, kept for support diagnostics.
    #[serde(default)]
    pub last_update_reason: String,

    // Tables last: TOML requires scalar values before tables.
    #[serde(default)]
    pub selected_palette: PaletteSelection,

    #[serde(default)]
    pub saved_palettes: BTreeMap<String, ColorPair>,
}

fn current_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            theme: ThemePreference::default(),
            last_update_reason: String::new(),
            selected_palette: PaletteSelection::default(),
            saved_palettes: BTreeMap::new(),
        }
    }
}

fn get_default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(SETTINGS_FILE);
        path
    })
}

/// Loads settings from the platform config dir, or defaults when the file
/// does not exist yet.
pub fn load() -> Result<LocalSettings> {
    if let Some(path) = get_default_settings_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    tracing::info!("local settings not found, using defaults");
    Ok(LocalSettings::default())
}

/// Records the update reason and writes the settings to the platform
/// config dir.
pub fn save(settings: &mut LocalSettings, reason: &str) -> Result<()> {
    settings.last_update_reason = reason.to_string();
    tracing::info!(reason, "writing local settings");
    if let Some(path) = get_default_settings_path() {
        return save_to_path(settings, &path);
    }
    Ok(())
}

/// Loads from an explicit path. A corrupt or out-of-version file resets to
/// defaults (logged, never an error to the caller); I/O failure is an
/// error.
pub fn load_from_path(path: &Path) -> Result<LocalSettings> {
    let content = fs::read_to_string(path)?;

    let settings: LocalSettings = match toml::from_str(&content) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(%err, "failed to read local settings, resetting to defaults");
            return Ok(LocalSettings::default());
        }
    };

    if settings.version < SETTINGS_MIN_SUPPORTED_VERSION {
        tracing::error!(
            version = settings.version,
            "unsupported local settings version, resetting to defaults"
        );
        return Ok(LocalSettings::default());
    }

    if settings.version > SETTINGS_VERSION {
        // Best-effort: unknown fields were already ignored during parsing.
        tracing::warn!(
            version = settings.version,
            "local settings written by a newer version, some settings may not load"
        );
    }

    Ok(settings)
}

pub fn save_to_path(settings: &LocalSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(settings)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_selection() {
        let mut settings = LocalSettings {
            theme: ThemePreference::Dark,
            selected_palette: PaletteSelection::new("alternatives", "Yellow on Black"),
            ..LocalSettings::default()
        };
        settings.saved_palettes.insert(
            "Mine".to_string(),
            ColorPair::new(Color::from_u32(0x102030), Color::from_u32(0xeeeeee)),
        );

        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested").join(SETTINGS_FILE);

        save_to_path(&settings, &path).expect("failed to save settings");
        let loaded = load_from_path(&path).expect("failed to load settings");

        assert_eq!(loaded, settings);
    }

    #[test]
    fn load_from_path_resets_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&path).expect("load should not error");
        assert_eq!(loaded, LocalSettings::default());
    }

    #[test]
    fn load_from_path_resets_on_malformed_color() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(SETTINGS_FILE);
        // A non-ASCII "hex" string that is still seven bytes long.
        fs::write(
            &path,
            "version = 1\n[saved_palettes.Mine]\nbackground = \"#a\u{e9}345\"\nforeground = \"#ffffff\"\n",
        )
        .expect("failed to write");

        let loaded = load_from_path(&path).expect("load should not error");
        assert_eq!(loaded, LocalSettings::default());
    }

    #[test]
    fn load_from_path_resets_on_unsupported_version() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "version = 0\ntheme = \"dark\"\n").expect("failed to write");

        let loaded = load_from_path(&path).expect("load should not error");
        assert_eq!(loaded, LocalSettings::default());
    }

    #[test]
    fn load_from_path_accepts_newer_version_best_effort() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "version = 99\ntheme = \"light\"\nfuture_field = 1\n")
            .expect("failed to write");

        let loaded = load_from_path(&path).expect("load should not error");
        assert_eq!(loaded.version, 99);
        assert_eq!(loaded.theme, ThemePreference::Light);
    }

    #[test]
    fn save_records_update_reason() {
        let mut settings = LocalSettings::default();
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(SETTINGS_FILE);

        settings.last_update_reason = "Toggle theme to dark".to_string();
        save_to_path(&settings, &path).expect("failed to save settings");

        let loaded = load_from_path(&path).expect("failed to load settings");
        assert_eq!(loaded.last_update_reason, "Toggle theme to dark");
    }

    #[test]
    fn default_settings_select_builtin_palette() {
        let settings = LocalSettings::default();
        assert_eq!(settings.version, SETTINGS_VERSION);
        assert_eq!(settings.selected_palette.group, "defaults");
        assert_eq!(settings.selected_palette.name, "White on Dark Grey");
    }
}
