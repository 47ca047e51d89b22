//! Player preferences.
//!
//! [`GameSettings`] is plain data handed to whoever needs it. Persistence goes
//! through a [`SettingsStorage`] injected into a [`SettingsManager`]; a stored
//! document is always merged over the defaults, so older documents missing
//! newer keys still load.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Storage key the settings document lives under.
pub const SETTINGS_KEY: &str = "astrofarm-settings";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.2,
            Difficulty::Expert => 1.5,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBlindMode {
    #[default]
    None,
    Protanopia,
    Deuteranopia,
    Tritanopia,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    // Audio
    pub sound_enabled: bool,
    pub music_enabled: bool,
    pub sound_volume: f64,
    pub music_volume: f64,

    // Visual
    pub show_tips: bool,
    pub show_animations: bool,
    pub show_particles: bool,
    pub ui_scale: f64,

    // Gameplay
    pub auto_save: bool,
    /// Minutes.
    pub auto_save_interval: u32,
    pub show_tutorial: bool,
    pub difficulty: Difficulty,

    // Accessibility
    pub high_contrast: bool,
    pub large_text: bool,
    pub reduced_motion: bool,
    pub color_blind_mode: ColorBlindMode,

    // Advanced
    pub debug_mode: bool,
    #[serde(rename = "showFPS")]
    pub show_fps: bool,
    pub experimental_features: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
            sound_volume: 0.7,
            music_volume: 0.5,
            show_tips: true,
            show_animations: true,
            show_particles: true,
            ui_scale: 1.0,
            auto_save: true,
            auto_save_interval: 5,
            show_tutorial: true,
            difficulty: Difficulty::Normal,
            high_contrast: false,
            large_text: false,
            reduced_motion: false,
            color_blind_mode: ColorBlindMode::None,
            debug_mode: false,
            show_fps: false,
            experimental_features: false,
        }
    }
}

impl GameSettings {
    pub fn difficulty_multiplier(&self) -> f64 {
        self.difficulty.multiplier()
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings document is not valid: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("settings document must be an object with a {0} field of the right type")]
    Invalid(&'static str),
    #[error("settings storage failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Key/value backend for the settings document.
pub trait SettingsStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;
    fn remove(&mut self, key: &str) -> Result<(), SettingsError>;
}

impl<S: SettingsStorage + ?Sized> SettingsStorage for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, SettingsError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        (**self).remove(key)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemorySettingsStorage {
    entries: HashMap<String, String>,
}

impl SettingsStorage for MemorySettingsStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileSettingsStorage {
    dir: PathBuf,
}

impl FileSettingsStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SettingsStorage for FileSettingsStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SettingsError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&path, value))
            .map_err(|source| SettingsError::Io { path, source })
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SettingsError::Io { path, source }),
        }
    }
}

/// Owns the live settings and the storage they persist to.
#[derive(Debug)]
pub struct SettingsManager<S> {
    storage: S,
    settings: GameSettings,
}

impl<S: SettingsStorage> SettingsManager<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            settings: GameSettings::default(),
        }
    }

    /// Reload from storage. Unreadable or malformed documents fall back to
    /// the defaults.
    pub fn load(&mut self) -> &GameSettings {
        self.settings = match self.read_stored() {
            Ok(Some(settings)) => settings,
            Ok(None) => GameSettings::default(),
            Err(err) => {
                warn!(error = %err, "settings unreadable, using defaults");
                GameSettings::default()
            }
        };
        &self.settings
    }

    fn read_stored(&self) -> Result<Option<GameSettings>, SettingsError> {
        match self.storage.read(SETTINGS_KEY)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Merge the keys of `patch` over the current settings and persist.
    ///
    /// Unknown keys are ignored; a known key with the wrong type rejects the
    /// whole patch.
    pub fn save(&mut self, patch: &Map<String, Value>) -> Result<&GameSettings, SettingsError> {
        let mut merged = match serde_json::to_value(&self.settings)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
        let settings: GameSettings = serde_json::from_value(Value::Object(merged))?;
        self.persist(settings)?;
        Ok(&self.settings)
    }

    /// Set a single camelCase key.
    pub fn set(&mut self, key: &str, value: Value) -> Result<&GameSettings, SettingsError> {
        let mut patch = Map::new();
        patch.insert(key.to_string(), value);
        self.save(&patch)
    }

    /// Read a single camelCase key.
    pub fn get(&self, key: &str) -> Option<Value> {
        serde_json::to_value(&self.settings)
            .ok()
            .and_then(|value| value.get(key).cloned())
    }

    pub fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = GameSettings::default();
        self.storage.remove(SETTINGS_KEY)
    }

    pub fn export(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(&self.settings)?)
    }

    /// Replace the settings with an exported document, filling any missing
    /// keys from the defaults.
    pub fn import(&mut self, json: &str) -> Result<&GameSettings, SettingsError> {
        let value: Value = serde_json::from_str(json)?;
        validate_document(&value)?;
        let settings: GameSettings = serde_json::from_value(value)?;
        self.persist(settings)?;
        Ok(&self.settings)
    }

    fn persist(&mut self, settings: GameSettings) -> Result<(), SettingsError> {
        let text = serde_json::to_string(&settings)?;
        self.storage.write(SETTINGS_KEY, &text)?;
        self.settings = settings;
        Ok(())
    }
}

fn validate_document(value: &Value) -> Result<(), SettingsError> {
    let map = value.as_object().ok_or(SettingsError::Invalid("soundEnabled"))?;
    for key in ["soundEnabled", "musicEnabled"] {
        if !map.get(key).is_some_and(Value::is_boolean) {
            return Err(SettingsError::Invalid(key));
        }
    }
    for key in ["soundVolume", "musicVolume"] {
        if !map.get(key).is_some_and(Value::is_number) {
            return Err(SettingsError::Invalid(key));
        }
    }
    Ok(())
}
