/// Per-category state
///
/// Decisions read one immutable `RuleSnapshot` behind an `Arc`. Writers
/// build a complete replacement and swap it in under the write lock, so a
/// decision sees either the old snapshot or the new one, never a mix.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::audio_system::{CueCategory, CustomSoundMap};
use crate::rules::RuleConfig;

/// Everything a decision reads for one category
#[derive(Debug, Default)]
pub struct RuleSnapshot {
    pub rules: RuleConfig,
    pub sounds: Arc<CustomSoundMap>,
}

/// Owned state of one cue category
pub struct CategoryState {
    category: CueCategory,
    snapshot: RwLock<Arc<RuleSnapshot>>,
    generation: AtomicU64,
}

impl CategoryState {
    pub fn new(category: CueCategory, rules: RuleConfig) -> Self {
        Self {
            category,
            snapshot: RwLock::new(Arc::new(RuleSnapshot {
                rules,
                sounds: Arc::default(),
            })),
            generation: AtomicU64::new(0),
        }
    }

    pub fn category(&self) -> CueCategory {
        self.category
    }

    /// Current snapshot; holding it never blocks writers
    pub fn snapshot(&self) -> Arc<RuleSnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    /// Replace the rules, keeping the installed sounds
    pub fn set_rules(&self, rules: RuleConfig) {
        let mut snapshot = self.snapshot.write();
        let sounds = Arc::clone(&snapshot.sounds);
        *snapshot = Arc::new(RuleSnapshot { rules, sounds });
    }

    /// Start a new sound rebuild pass; every earlier pass becomes stale
    pub fn begin_rebuild(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `generation` is still the newest rebuild pass
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Install the sound map built by pass `generation`.
    ///
    /// Returns false and drops `sounds` if a newer pass has started.
    pub fn install_sounds(&self, generation: u64, sounds: CustomSoundMap) -> bool {
        let previous = {
            let mut snapshot = self.snapshot.write();
            if !self.is_current(generation) {
                return false;
            }

            let rules = snapshot.rules.clone();
            std::mem::replace(
                &mut *snapshot,
                Arc::new(RuleSnapshot {
                    rules,
                    sounds: Arc::new(sounds),
                }),
            )
        };

        // Old handles are released outside the lock
        drop(previous);
        true
    }

    /// Drop all rules and sounds and invalidate any pass in flight
    pub fn clear(&self) {
        self.begin_rebuild();
        let previous = std::mem::take(&mut *self.snapshot.write());
        drop(previous);
    }
}
