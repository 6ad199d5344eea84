//! Settings loading for the CLI.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use undertone_utils::{AppSettings, configure_telemetry, default_settings_path};

/// Load `config/undertone_settings.json` from the working directory, or the
/// built-in defaults when it does not exist.
pub fn load_settings() -> Result<AppSettings> {
    load_settings_from(&default_settings_path())
}

pub fn load_settings_from(path: &Path) -> Result<AppSettings> {
    if path.exists() {
        let settings = AppSettings::load_from_path(path)
            .with_context(|| format!("Could not load settings {}", path.display()))?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    } else {
        debug!("No settings at {}; using defaults", path.display());
        Ok(AppSettings::default())
    }
}

/// Apply the telemetry section to the global timing switches.
pub fn apply_telemetry(settings: &AppSettings) {
    configure_telemetry(
        settings.telemetry.enabled,
        settings.telemetry.level_filter(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use undertone_utils::UndertoneRule;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn existing_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"undertone": {"rule": "legacy_lab"}}"#).unwrap();
        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings.undertone.rule, UndertoneRule::LegacyLab);
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_settings_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("settings.json"));
    }
}
