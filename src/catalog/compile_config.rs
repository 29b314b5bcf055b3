use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::catalog::TextEncoding;

/// Per-connection settings that influence expression compilation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompileConfig {
    pub encoding: TextEncoding,
    /// Largest accepted `?NNN` parameter number.
    pub max_variable_number: usize,
    pub default_collation: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self { encoding: TextEncoding::Utf8, max_variable_number: 999, default_collation: "BINARY".to_string() }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "could not read configuration: {}", e),
            ConfigError::Json(e) => write!(f, "configuration is not valid JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl CompileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(encoding: TextEncoding, max_variable_number: usize) -> Self {
        Self { encoding, max_variable_number, ..Self::default() }
    }

    pub fn utf16le() -> Self {
        Self { encoding: TextEncoding::Utf16Le, ..Self::default() }
    }

    pub fn utf16be() -> Self {
        Self { encoding: TextEncoding::Utf16Be, ..Self::default() }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Json)
    }

    /// Reads a JSON configuration file; missing keys keep their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }
}
