//! User settings stored as settings.json in the app data directory

use crate::constants::{DEFAULT_SERVICE_URL, SERVICE_URL_ENV};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Service
    pub service_url: String,

    // View
    pub show_thumbnails: bool,
    pub last_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            service_url: DEFAULT_SERVICE_URL.to_string(),
            show_thumbnails: true,
            last_title: String::new(),
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Service root for this session: the environment wins over the file.
    pub fn effective_service_url(&self) -> String {
        self.service_url_with(std::env::var(SERVICE_URL_ENV).ok())
    }

    fn service_url_with(&self, env_override: Option<String>) -> String {
        match env_override.filter(|v| !v.trim().is_empty()) {
            Some(url) => {
                info!(url = %url, "Service url overridden from environment");
                url
            }
            None if self.service_url.trim().is_empty() => DEFAULT_SERVICE_URL.to_string(),
            None => self.service_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "content-browser-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = temp_dir("missing");
        let _ = std::fs::remove_file(dir.join("settings.json"));
        assert_eq!(Settings::load(&dir), Settings::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = temp_dir("roundtrip");
        let settings = Settings {
            service_url: "http://content.internal:9000/demo/rest".into(),
            show_thumbnails: false,
            last_title: "Dune".into(),
            window_w: Some(1200.0),
            window_h: Some(700.0),
            ..Settings::default()
        };
        settings.save(&dir);
        assert_eq!(Settings::load(&dir), settings);
    }

    #[test]
    fn partial_or_broken_files_fall_back() {
        let dir = temp_dir("partial");
        std::fs::write(dir.join("settings.json"), r#"{ "show_thumbnails": false }"#).unwrap();
        let loaded = Settings::load(&dir);
        assert!(!loaded.show_thumbnails);
        assert_eq!(loaded.service_url, DEFAULT_SERVICE_URL);

        std::fs::write(dir.join("settings.json"), "{ not json").unwrap();
        assert_eq!(Settings::load(&dir), Settings::default());
    }

    #[test]
    fn environment_overrides_file() {
        let settings = Settings {
            service_url: "http://from-file/demo/rest".into(),
            ..Settings::default()
        };
        assert_eq!(
            settings.service_url_with(Some("http://from-env/demo/rest".into())),
            "http://from-env/demo/rest"
        );
        assert_eq!(settings.service_url_with(Some("  ".into())), "http://from-file/demo/rest");
        assert_eq!(settings.service_url_with(None), "http://from-file/demo/rest");

        let blank = Settings {
            service_url: String::new(),
            ..Settings::default()
        };
        assert_eq!(blank.service_url_with(None), DEFAULT_SERVICE_URL);
    }
}
