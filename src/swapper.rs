/// Sound swapper facade
///
/// Owns both category states, the custom sound cache and the player, and is
/// the only type the host talks to. Nothing on the event or configuration
/// paths returns an error: failures are logged and degrade to pass-through
/// or a skipped sound.
use std::sync::Arc;

use crossbeam_channel::Receiver;
use parking_lot::{Mutex, RwLock};

use crate::audio_system::{CueCategory, CuePlayer, RebuildTicket, SoundCache};
use crate::config::{ensure_sound_dir, ConfigKey, SwapperConfig};
use crate::cue::CueEvent;
use crate::debug_feed::{CueReport, DebugFeed};
use crate::engine::{decide, Decision, Replacement};
use crate::host::HostAudio;
use crate::messaging::{EventBus, SubscriberId, SwapperEvent};
use crate::rules::RuleConfig;
use crate::state::{CategoryState, Lifecycle, LifecycleState, RuleSnapshot};

/// Volume for host replacements of point cues
const HOST_SWAP_VOLUME: u8 = 100;

/// Result handed back to the host for one cue
#[derive(Debug, Clone)]
pub struct CueOutcome {
    /// The host must not play the original cue
    pub consumed: bool,
    pub decision: Decision,
}

impl CueOutcome {
    fn pass() -> Self {
        Self {
            consumed: false,
            decision: Decision::Pass,
        }
    }
}

pub struct SoundSwapper {
    config: RwLock<SwapperConfig>,
    point: Arc<CategoryState>,
    area: Arc<CategoryState>,
    cache: SoundCache,
    player: Arc<dyn CuePlayer>,
    host: Arc<dyn HostAudio>,
    bus: EventBus,
    debug_feed: DebugFeed,
    lifecycle: Mutex<Lifecycle>,
}

impl SoundSwapper {
    /// Build rules for both categories and load their custom sounds.
    ///
    /// Sound loading runs on the calling thread, so the first cue already
    /// sees every clip that could be decoded.
    pub fn start(
        config: SwapperConfig,
        player: Arc<dyn CuePlayer>,
        host: Arc<dyn HostAudio>,
    ) -> Self {
        let sound_dir = config.sound_dir();
        if let Err(err) = ensure_sound_dir(&sound_dir) {
            tracing::error!("{}, continuing without custom sounds", err);
        }

        let bus = EventBus::new();
        let cache = SoundCache::with_events(sound_dir, bus.clone());

        let point = Arc::new(CategoryState::new(
            CueCategory::Point,
            RuleConfig::from_config(&config, CueCategory::Point),
        ));
        let area = Arc::new(CategoryState::new(
            CueCategory::Area,
            RuleConfig::from_config(&config, CueCategory::Area),
        ));

        for state in [&point, &area] {
            cache.rebuild_blocking(state, config.custom_sound_ids(state.category()));
        }

        tracing::info!(
            "Sound swapper started (sound dir: {})",
            cache.sound_dir().display()
        );

        Self {
            config: RwLock::new(config),
            point,
            area,
            cache,
            player,
            host,
            bus,
            debug_feed: DebugFeed::new(),
            lifecycle: Mutex::new(Lifecycle::running()),
        }
    }

    fn category_state(&self, category: CueCategory) -> &Arc<CategoryState> {
        match category {
            CueCategory::Point => &self.point,
            CueCategory::Area => &self.area,
        }
    }

    fn is_running(&self) -> bool {
        self.lifecycle.lock().state().is_running()
    }

    /// Decide one cue and start its replacement, if any
    pub fn on_cue(&self, event: &CueEvent) -> CueOutcome {
        if !self.is_running() {
            return CueOutcome::pass();
        }

        let snapshot = self.category_state(event.category).snapshot();
        let decision = decide(event.sound_id, &snapshot);

        match &decision {
            Decision::Replace(Replacement::Host { sound_id }) => {
                let volume = match event.category {
                    CueCategory::Point => Some(HOST_SWAP_VOLUME),
                    CueCategory::Area => None,
                };
                self.host.play_sound_effect(*sound_id, volume);
            }
            Decision::Replace(Replacement::Custom { clip, volume }) => {
                if let Err(err) = self.player.play(Arc::clone(clip), *volume) {
                    tracing::warn!("Custom sound {} not played: {}", event.sound_id, err);
                    self.bus.publish(SwapperEvent::PlaybackFailed {
                        sound_id: event.sound_id,
                        message: err.to_string(),
                    });
                }
            }
            Decision::Pass | Decision::Consume => {}
        }

        tracing::debug!(
            "{} {} -> {}",
            event.category,
            event.sound_id,
            decision.description()
        );

        let consumed = decision.consumes();
        let report = CueReport::new(event, &decision, &snapshot);
        if self.config.read().debug_sound_effects {
            self.debug_feed.push(report.clone());
        }
        self.bus
            .publish(SwapperEvent::CueHandled { report, consumed });

        CueOutcome { consumed, decision }
    }

    /// Apply one configuration change event.
    ///
    /// Returns the rebuild ticket when the change reloads a custom sound list.
    pub fn on_config_changed(&self, key: &str, value: &str) -> Option<RebuildTicket> {
        if !self.is_running() {
            return None;
        }

        let (key, ticket) = {
            let mut config = self.config.write();
            let key = match config.set(key, value) {
                Ok(key) => key,
                Err(err) => {
                    tracing::warn!("Ignoring config change: {}", err);
                    return None;
                }
            };

            // Rules and the rebuild generation are taken under the config
            // lock, so the newest value always gets the newest pass
            for category in CueCategory::ALL {
                self.category_state(category)
                    .set_rules(RuleConfig::from_config(&config, category));
            }

            let ticket = key.sound_list_category().map(|category| {
                self.cache.rebuild(
                    self.category_state(category),
                    config.custom_sound_ids(category),
                )
            });
            (key, ticket)
        };

        tracing::info!("Config changed: {} = {:?}", key, value);

        match key {
            ConfigKey::ConsumeAmbientSounds => self.host.request_scene_reload(),
            ConfigKey::SoundDir => {
                tracing::info!("Sound directory change takes effect after restart")
            }
            _ => {}
        }

        self.debug_feed.reset();
        self.bus.publish(SwapperEvent::ConfigChanged { key });

        ticket
    }

    /// Called by the host after a scene finished loading
    pub fn on_scene_loaded(&self) {
        if self.is_running() && self.config.read().consume_ambient_sounds {
            tracing::debug!("Clearing ambient sounds");
            self.host.clear_ambient_sounds();
        }
    }

    /// Rules and sounds currently live for `category`
    pub fn snapshot(&self, category: CueCategory) -> Arc<RuleSnapshot> {
        self.category_state(category).snapshot()
    }

    pub fn config(&self) -> SwapperConfig {
        self.config.read().clone()
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.lock().state()
    }

    pub fn subscribe(&self) -> (Receiver<SwapperEvent>, SubscriberId) {
        self.bus.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.bus.unsubscribe(id);
    }

    /// Debug overlay lines, oldest first
    pub fn debug_lines(&self) -> Vec<CueReport> {
        self.debug_feed.lines()
    }

    /// Release every clip, thread and output handle. Safe to call twice.
    pub fn shutdown(&self) {
        if self.lifecycle.lock().begin_shutdown().is_err() {
            return;
        }

        tracing::info!("Shutting down sound swapper");

        // Clearing first makes every pass in flight stale
        for category in CueCategory::ALL {
            self.category_state(category).clear();
        }
        self.cache.shutdown();
        self.debug_feed.reset();
        self.bus.publish(SwapperEvent::Shutdown);
        self.player.shutdown();

        self.lifecycle.lock().finish_shutdown();
        tracing::info!("Sound swapper stopped");
    }
}

impl Drop for SoundSwapper {
    fn drop(&mut self) {
        self.shutdown();
    }
}
