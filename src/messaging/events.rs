/// Swapper notifications
///
/// Events describe things that already happened (past tense) and are
/// broadcast to every subscriber.
use crate::audio_system::CueCategory;
use crate::config::ConfigKey;
use crate::debug_feed::CueReport;

/// Swapper events
#[derive(Debug, Clone)]
pub enum SwapperEvent {
    /// A cue was decided
    CueHandled { report: CueReport, consumed: bool },

    /// A rebuild pass installed a new custom sound map
    SoundsInstalled {
        category: CueCategory,
        loaded: usize,
        requested: usize,
    },

    /// A configuration key changed
    ConfigChanged { key: ConfigKey },

    /// A replacement clip could not be played; the cue stayed consumed
    PlaybackFailed { sound_id: u32, message: String },

    /// The swapper is shutting down
    Shutdown,
}

impl SwapperEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            SwapperEvent::CueHandled { report, consumed } => {
                if *consumed {
                    format!("{} (consumed)", report)
                } else {
                    report.to_string()
                }
            }
            SwapperEvent::SoundsInstalled {
                category,
                loaded,
                requested,
            } => format!("{}: {} of {} custom sounds loaded", category, loaded, requested),
            SwapperEvent::ConfigChanged { key } => format!("Config changed: {}", key),
            SwapperEvent::PlaybackFailed { sound_id, message } => {
                format!("Playback failed for {}: {}", sound_id, message)
            }
            SwapperEvent::Shutdown => "Shutting down".to_string(),
        }
    }
}
