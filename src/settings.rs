use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use log::warn;
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Errors that can occur loading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Key/value store for tool properties. Tools receive a shared handle at
/// construction and write through synchronously on every setter — there is
/// no batching and no ambient global state.
pub trait SettingsStore {
    fn get_f64(&self, key: &str, default: f64) -> f64;
    fn get_i64(&self, key: &str, default: i64) -> i64;
    fn get_bool(&self, key: &str, default: bool) -> bool;

    fn set_f64(&mut self, key: &str, value: f64);
    fn set_i64(&mut self, key: &str, value: i64);
    fn set_bool(&mut self, key: &str, value: bool);
}

pub type SharedSettings = Rc<RefCell<dyn SettingsStore>>;

pub fn shared<S: SettingsStore + 'static>(store: S) -> SharedSettings {
    Rc::new(RefCell::new(store))
}

/// Volatile store, used in tests and as a fallback when no settings file
/// is configured.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: HashMap<String, Value>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.values.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).and_then(Value::as_i64).unwrap_or(default)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn set_f64(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_owned(), json!(value));
    }

    fn set_i64(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_owned(), json!(value));
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_owned(), json!(value));
    }
}

/// Settings persisted as a pretty-printed JSON object, rewritten on every
/// set. A failed write keeps the in-memory value and logs a warning; it
/// never surfaces into the tool code path.
#[derive(Debug)]
pub struct JsonSettings {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonSettings {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    fn sync(&self) {
        let result = serde_json::to_string_pretty(&self.values)
            .map_err(SettingsError::from)
            .and_then(|json| fs::write(&self.path, json).map_err(SettingsError::from));
        if let Err(err) = result {
            warn!("settings write to {:?} failed: {err}", self.path);
        }
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_owned(), value);
        self.sync();
    }
}

impl SettingsStore for JsonSettings {
    fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.values.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).and_then(Value::as_i64).unwrap_or(default)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn set_f64(&mut self, key: &str, value: f64) {
        self.set(key, json!(value));
    }

    fn set_i64(&mut self, key: &str, value: i64) {
        self.set(key, json!(value));
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, json!(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemorySettings::new();
        assert_eq!(store.get_f64("brushWidth", 15.0), 15.0);
        store.set_f64("brushWidth", 24.0);
        store.set_bool("brushPressure", true);
        assert_eq!(store.get_f64("brushWidth", 15.0), 24.0);
        assert!(store.get_bool("brushPressure", false));
    }

    #[test]
    fn json_store_persists_every_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = JsonSettings::load(&path).unwrap();
        store.set_f64("eraserWidth", 32.0);
        store.set_i64("rotationIncrement", 30);

        let reloaded = JsonSettings::load(&path).unwrap();
        assert_eq!(reloaded.get_f64("eraserWidth", 24.0), 32.0);
        assert_eq!(reloaded.get_i64("rotationIncrement", 15), 30);
    }

    #[test]
    fn missing_file_starts_empty() {
        let store = JsonSettings::load("/nonexistent/dir/settings.json").unwrap();
        assert_eq!(store.get_i64("rotationIncrement", 15), 15);
    }
}
