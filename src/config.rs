//! Settings read from the YAML configuration file
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use crate::Error;

/// Name of the configuration file inside the application directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Returns `~/.chesscore`, or the current directory if there is no home directory
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".chesscore"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Key/value settings. Every value is kept as a string and interpreted by whoever asks for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    /// Reads the settings at `path`
    pub fn load(path: &Path) -> Result<Settings, Error> {
        let values: HashMap<String, Value> = read_yaml(path)
            .map_err(|err| Error(format!("{}: {}", path.display(), err)))?;
        Settings::from_values(values)
    }

    /// Reads the settings at `path` if the file exists, or returns empty settings
    pub fn load_if_present(path: &Path) -> Result<Settings, Error> {
        if path.is_file() {
            Settings::load(path)
        } else {
            Ok(Settings::default())
        }
    }

    /// Parses settings from YAML text
    pub fn from_yaml_str(s: &str) -> Result<Settings, Error> {
        if s.trim().is_empty() {
            return Ok(Settings::default());
        }
        Settings::from_values(serde_yaml::from_str(s)?)
    }

    fn from_values(values: HashMap<String, Value>) -> Result<Settings, Error> {
        let mut settings = Settings::default();
        for (key, value) in values {
            let value = match value {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Null => continue,
                _ => return Err(Error(format!("{}: expected a single value", key))),
            };
            settings.values.insert(key, value);
        }
        Ok(settings)
    }

    /// Returns the value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` is set to `true`, `yes`, `on` or `1`
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => true,
                _ => false,
            },
            None => false,
        }
    }
}

/// Deserializes the YAML file at `path`
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let s = read_to_string(path)?;
    Ok(serde_yaml::from_str(&s)?)
}
