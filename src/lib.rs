//! Sound cue interception for a host application.
//!
//! The host hands every sound cue to [`SoundSwapper::on_cue`] before playing
//! it. Depending on per-category rules the cue passes through, is consumed,
//! is remapped to another host sound, or is replaced by a custom WAV clip.

pub mod audio_system;
pub mod config;
pub mod cue;
pub mod debug_feed;
pub mod distance;
pub mod engine;
pub mod error;
pub mod host;
pub mod ids;
pub mod messaging;
pub mod rules;
pub mod state;
pub mod swapper;

pub use audio_system::{CueCategory, CuePlayer, RodioPlayer, SoundClip, Volume};
pub use config::{ConfigKey, SwapperConfig};
pub use cue::{CueEvent, ScenePoint};
pub use engine::{Decision, Replacement};
pub use error::{AudioError, ConfigError};
pub use host::HostAudio;
pub use messaging::{EventBus, SwapperEvent};
pub use swapper::{CueOutcome, SoundSwapper};
