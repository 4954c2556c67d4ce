use serde::Deserialize;
use std::{fs, io};

const SETTINGS_FILENAME: &str = "settings.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_address: String,
    pub port: u16,
    pub database_path: String,
    pub static_dir: String,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            database_path: "tasks.redb".to_string(),
            static_dir: "frontend/dist".to_string(),
        }
    }
}

impl Settings {
    /// Read settings.json from the working directory. A missing file
    /// means defaults; a present but malformed file is an error.
    pub fn load() -> Result<Settings, SettingsError> {
        match fs::read_to_string(SETTINGS_FILENAME) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| SettingsError::Parse(e.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(SettingsError::Io(e.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "settings: {e}"),
            SettingsError::Parse(e) => write!(f, "settings: {e}"),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
