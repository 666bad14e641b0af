use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::audio_system::{CueCategory, Volume};
use crate::error::ConfigError;

const APP_DIR: &str = "SoundSwapper";

/// Every option the swapper reads, named by its configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SwapperConfig {
    /// Swap point cues with custom clips
    pub enable_custom_sounds: bool,

    /// Point cue ids with a `<id>.wav` replacement
    pub custom_sounds: String,

    /// Swap area cues with custom clips
    pub enable_custom_area_sounds: bool,

    /// Area cue ids with a `<id>.wav` replacement
    pub custom_area_sounds: String,

    /// Consume every point cue that is not custom
    pub consume_sound_effects: bool,

    /// Consume every area cue that is not custom
    pub consume_area_sounds: bool,

    pub whitelist_sounds: String,
    pub blacklist_sounds: String,
    pub whitelist_area_sounds: String,
    pub blacklist_area_sounds: String,

    pub enable_custom_volume: bool,

    /// Point clip volume (0-100)
    pub custom_volume: u8,

    pub enable_custom_area_volume: bool,

    /// Area clip volume (0-100)
    pub custom_area_volume: u8,

    /// Remap ids onto other host-native ids
    pub simple_id_swap_enabled: bool,
    pub simple_source_ids: String,
    pub simple_replacement_ids: String,

    /// Clear the host's ambient sounds whenever a scene loads
    pub consume_ambient_sounds: bool,

    /// Record recent decisions in the debug feed
    pub debug_sound_effects: bool,

    /// Override for the directory holding `<id>.wav` files
    pub sound_dir: Option<PathBuf>,
}

impl Default for SwapperConfig {
    fn default() -> Self {
        Self {
            enable_custom_sounds: false,
            custom_sounds: String::new(),
            enable_custom_area_sounds: false,
            custom_area_sounds: String::new(),
            consume_sound_effects: false,
            consume_area_sounds: false,
            whitelist_sounds: String::new(),
            blacklist_sounds: String::new(),
            whitelist_area_sounds: String::new(),
            blacklist_area_sounds: String::new(),
            enable_custom_volume: false,
            custom_volume: Volume::DEFAULT_PERCENT,
            enable_custom_area_volume: false,
            custom_area_volume: Volume::DEFAULT_PERCENT,
            simple_id_swap_enabled: false,
            simple_source_ids: String::new(),
            simple_replacement_ids: String::new(),
            consume_ambient_sounds: false,
            debug_sound_effects: false,
            sound_dir: None,
        }
    }
}

/// Configuration keys delivered by change events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    EnableCustomSounds,
    CustomSounds,
    EnableCustomAreaSounds,
    CustomAreaSounds,
    ConsumeSoundEffects,
    ConsumeAreaSounds,
    WhitelistSounds,
    BlacklistSounds,
    WhitelistAreaSounds,
    BlacklistAreaSounds,
    EnableCustomVolume,
    CustomVolume,
    EnableCustomAreaVolume,
    CustomAreaVolume,
    SimpleIdSwapEnabled,
    SimpleSourceIds,
    SimpleReplacementIds,
    ConsumeAmbientSounds,
    DebugSoundEffects,
    SoundDir,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 20] = [
        ConfigKey::EnableCustomSounds,
        ConfigKey::CustomSounds,
        ConfigKey::EnableCustomAreaSounds,
        ConfigKey::CustomAreaSounds,
        ConfigKey::ConsumeSoundEffects,
        ConfigKey::ConsumeAreaSounds,
        ConfigKey::WhitelistSounds,
        ConfigKey::BlacklistSounds,
        ConfigKey::WhitelistAreaSounds,
        ConfigKey::BlacklistAreaSounds,
        ConfigKey::EnableCustomVolume,
        ConfigKey::CustomVolume,
        ConfigKey::EnableCustomAreaVolume,
        ConfigKey::CustomAreaVolume,
        ConfigKey::SimpleIdSwapEnabled,
        ConfigKey::SimpleSourceIds,
        ConfigKey::SimpleReplacementIds,
        ConfigKey::ConsumeAmbientSounds,
        ConfigKey::DebugSoundEffects,
        ConfigKey::SoundDir,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::EnableCustomSounds => "enable-custom-sounds",
            ConfigKey::CustomSounds => "custom-sounds",
            ConfigKey::EnableCustomAreaSounds => "enable-custom-area-sounds",
            ConfigKey::CustomAreaSounds => "custom-area-sounds",
            ConfigKey::ConsumeSoundEffects => "consume-sound-effects",
            ConfigKey::ConsumeAreaSounds => "consume-area-sounds",
            ConfigKey::WhitelistSounds => "whitelist-sounds",
            ConfigKey::BlacklistSounds => "blacklist-sounds",
            ConfigKey::WhitelistAreaSounds => "whitelist-area-sounds",
            ConfigKey::BlacklistAreaSounds => "blacklist-area-sounds",
            ConfigKey::EnableCustomVolume => "enable-custom-volume",
            ConfigKey::CustomVolume => "custom-volume",
            ConfigKey::EnableCustomAreaVolume => "enable-custom-area-volume",
            ConfigKey::CustomAreaVolume => "custom-area-volume",
            ConfigKey::SimpleIdSwapEnabled => "simple-id-swap-enabled",
            ConfigKey::SimpleSourceIds => "simple-source-ids",
            ConfigKey::SimpleReplacementIds => "simple-replacement-ids",
            ConfigKey::ConsumeAmbientSounds => "consume-ambient-sounds",
            ConfigKey::DebugSoundEffects => "debug-sound-effects",
            ConfigKey::SoundDir => "sound-dir",
        }
    }

    /// The category whose custom sound cache this key feeds, if any
    pub fn sound_list_category(&self) -> Option<CueCategory> {
        match self {
            ConfigKey::CustomSounds => Some(CueCategory::Point),
            ConfigKey::CustomAreaSounds => Some(CueCategory::Area),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_bool(key: ConfigKey, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_volume(key: ConfigKey, value: &str) -> Result<u8, ConfigError> {
    value
        .trim()
        .parse::<i64>()
        .map(|v| Volume::new(v).percent())
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

impl SwapperConfig {
    /// Apply one change event. Returns the key that changed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<ConfigKey, ConfigError> {
        let key: ConfigKey = key.parse()?;

        match key {
            ConfigKey::EnableCustomSounds => self.enable_custom_sounds = parse_bool(key, value)?,
            ConfigKey::CustomSounds => self.custom_sounds = value.to_string(),
            ConfigKey::EnableCustomAreaSounds => {
                self.enable_custom_area_sounds = parse_bool(key, value)?
            }
            ConfigKey::CustomAreaSounds => self.custom_area_sounds = value.to_string(),
            ConfigKey::ConsumeSoundEffects => self.consume_sound_effects = parse_bool(key, value)?,
            ConfigKey::ConsumeAreaSounds => self.consume_area_sounds = parse_bool(key, value)?,
            ConfigKey::WhitelistSounds => self.whitelist_sounds = value.to_string(),
            ConfigKey::BlacklistSounds => self.blacklist_sounds = value.to_string(),
            ConfigKey::WhitelistAreaSounds => self.whitelist_area_sounds = value.to_string(),
            ConfigKey::BlacklistAreaSounds => self.blacklist_area_sounds = value.to_string(),
            ConfigKey::EnableCustomVolume => self.enable_custom_volume = parse_bool(key, value)?,
            ConfigKey::CustomVolume => self.custom_volume = parse_volume(key, value)?,
            ConfigKey::EnableCustomAreaVolume => {
                self.enable_custom_area_volume = parse_bool(key, value)?
            }
            ConfigKey::CustomAreaVolume => self.custom_area_volume = parse_volume(key, value)?,
            ConfigKey::SimpleIdSwapEnabled => {
                self.simple_id_swap_enabled = parse_bool(key, value)?
            }
            ConfigKey::SimpleSourceIds => self.simple_source_ids = value.to_string(),
            ConfigKey::SimpleReplacementIds => self.simple_replacement_ids = value.to_string(),
            ConfigKey::ConsumeAmbientSounds => {
                self.consume_ambient_sounds = parse_bool(key, value)?
            }
            ConfigKey::DebugSoundEffects => self.debug_sound_effects = parse_bool(key, value)?,
            ConfigKey::SoundDir => {
                let value = value.trim();
                self.sound_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
        }

        Ok(key)
    }

    pub fn custom_enabled(&self, category: CueCategory) -> bool {
        match category {
            CueCategory::Point => self.enable_custom_sounds,
            CueCategory::Area => self.enable_custom_area_sounds,
        }
    }

    /// Raw id list for the category's custom sound cache
    pub fn custom_sound_ids(&self, category: CueCategory) -> &str {
        match category {
            CueCategory::Point => &self.custom_sounds,
            CueCategory::Area => &self.custom_area_sounds,
        }
    }

    pub fn consume_all(&self, category: CueCategory) -> bool {
        match category {
            CueCategory::Point => self.consume_sound_effects,
            CueCategory::Area => self.consume_area_sounds,
        }
    }

    pub fn whitelist(&self, category: CueCategory) -> &str {
        match category {
            CueCategory::Point => &self.whitelist_sounds,
            CueCategory::Area => &self.whitelist_area_sounds,
        }
    }

    pub fn blacklist(&self, category: CueCategory) -> &str {
        match category {
            CueCategory::Point => &self.blacklist_sounds,
            CueCategory::Area => &self.blacklist_area_sounds,
        }
    }

    /// Volume to force on replacement clips, when custom volume is enabled
    pub fn volume_override(&self, category: CueCategory) -> Option<Volume> {
        let (enabled, percent) = match category {
            CueCategory::Point => (self.enable_custom_volume, self.custom_volume),
            CueCategory::Area => (self.enable_custom_area_volume, self.custom_area_volume),
        };
        enabled.then(|| Volume::new(percent as i64))
    }

    /// Directory holding `<id>.wav` files
    pub fn sound_dir(&self) -> PathBuf {
        self.sound_dir.clone().unwrap_or_else(default_sound_dir)
    }

    /// Load configuration from the platform config directory.
    /// Creates a default config if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`, writing defaults there when absent
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = SwapperConfig::default();
            config.save_to(path)?;
            tracing::info!("Created default config at: {}", path.display());
            return Ok(config);
        }

        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::LoadFailed {
                path: path.display().to_string(),
                source,
            }
        };

        let content = fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: SwapperConfig =
            serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to the platform config directory
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::SaveFailed {
                path: path.display().to_string(),
                source,
            }
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_failed(Box::new(e)))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))?;

        Ok(())
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join("config.json"))
            .ok_or_else(|| ConfigError::Invalid("no platform config directory".to_string()))
    }
}

fn default_sound_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(APP_DIR))
}

/// Directory for log files
pub fn log_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Create the sound directory if it is missing
pub fn ensure_sound_dir(path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|source| ConfigError::DirectoryCreationFailed {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!("Created sound directory: {}", path.display());
    Ok(())
}
