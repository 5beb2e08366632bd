use log::{debug, error, info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "vimg";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Pixels moved per arrow/WASD press
    #[serde(default = "default_pan_step")]
    pub pan_step: i32,

    /// Pixels moved per shifted arrow/WASD press
    #[serde(default = "default_fast_pan_step")]
    pub fast_pan_step: i32,

    #[serde(default = "default_zoom_step")]
    pub zoom_step: i32,

    #[serde(default = "default_fast_zoom_step")]
    pub fast_zoom_step: i32,

    /// Keep the middle of the view in place when the terminal is resized
    #[serde(default = "default_true")]
    pub maintain_center_on_resize: bool,
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_pan_step() -> i32 {
    1
}

fn default_fast_pan_step() -> i32 {
    3
}

fn default_zoom_step() -> i32 {
    1
}

fn default_fast_zoom_step() -> i32 {
    2
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            pan_step: default_pan_step(),
            fast_pan_step: default_fast_pan_step(),
            zoom_step: default_zoom_step(),
            fast_zoom_step: default_fast_zoom_step(),
            maintain_center_on_resize: true,
        }
    }
}

pub fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from `path`, or from the user config directory when `None`.
///
/// Missing or broken files are logged and yield defaults.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match preferred_config_path() {
            Some(path) => path,
            None => {
                warn!("Could not determine config directory, using default settings");
                return Settings::default();
            }
        },
    };

    if !path.exists() {
        info!("Settings file {path:?} not found, using defaults");
        return Settings::default();
    }

    load_settings_from_path(&path)
}

fn load_settings_from_path(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {path:?}");
                settings
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
                Settings::default()
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
            Settings::default()
        }
    }
}

pub fn parse_settings(content: &str) -> Result<Settings, serde_yaml::Error> {
    let mut settings: Settings = serde_yaml::from_str(content)?;
    if settings.version < CURRENT_VERSION {
        info!(
            "Migrating settings from v{} to v{}",
            settings.version, CURRENT_VERSION
        );
        settings.version = CURRENT_VERSION;
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let settings = parse_settings("fast_pan_step: 8\nmaintain_center_on_resize: false\n").unwrap();

        assert_eq!(settings.fast_pan_step, 8);
        assert!(!settings.maintain_center_on_resize);
        assert_eq!(settings.pan_step, 1);
        assert_eq!(settings.fast_zoom_step, 2);
        assert_eq!(settings.version, CURRENT_VERSION);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(parse_settings("pan_step: [oops").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "zoom_step: 3").unwrap();

        let settings = load_settings(Some(file.path()));
        assert_eq!(settings.zoom_step, 3);
    }

    #[test]
    fn test_missing_or_broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert_eq!(load_settings(Some(&missing)), Settings::default());

        let broken = dir.path().join("broken.yaml");
        fs::write(&broken, "pan_step: {").unwrap();
        assert_eq!(load_settings(Some(&broken)), Settings::default());
    }
}
