use thiserror::Error;

/// Errors produced by the swapper's library surface.
///
/// None of these ever reach the host: the event and configuration paths log
/// them and degrade to pass-through or a silent skip.

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Sound file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to load sound file: {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to decode sound file: {path}")]
    DecodeFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid audio format: {0}")]
    InvalidFormat(String),

    #[error("Failed to initialize audio output stream")]
    StreamInitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Audio output device unavailable")]
    DeviceUnavailable,

    #[error("Audio playback failed")]
    PlaybackFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A single comma-separated token that is not a non-negative integer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid sound id: {token:?}")]
pub struct IdParseError {
    pub token: String,
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
