/// Per-event decision engine
///
/// Rule precedence, first match wins:
///
/// 1. simple swap: replay through the host under the mapped id
/// 2. custom clip: replace with the category's decoded clip
/// 3. consume-all or blacklisted: consume, unless whitelisted
/// 4. pass
use std::sync::Arc;

use crate::audio_system::{SoundClip, Volume};
use crate::state::RuleSnapshot;

/// What replaces a consumed cue
#[derive(Debug, Clone)]
pub enum Replacement {
    /// Host plays its own sound under another id
    Host { sound_id: u32 },

    /// A custom clip from the sound directory
    Custom {
        clip: Arc<SoundClip>,
        volume: Option<Volume>,
    },
}

/// Outcome for one cue event
#[derive(Debug, Clone)]
pub enum Decision {
    /// Host plays the original cue
    Pass,

    /// Nothing plays
    Consume,

    /// Original cue is suppressed and something else plays
    Replace(Replacement),
}

impl Decision {
    /// Whether the host must suppress its own playback
    pub fn consumes(&self) -> bool {
        !matches!(self, Decision::Pass)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Decision::Pass => "pass",
            Decision::Consume => "consume",
            Decision::Replace(Replacement::Host { .. }) => "host swap",
            Decision::Replace(Replacement::Custom { .. }) => "custom sound",
        }
    }
}

/// Decide what happens to cue `sound_id` under `snapshot`
pub fn decide(sound_id: u32, snapshot: &RuleSnapshot) -> Decision {
    let rules = &snapshot.rules;

    if rules.simple_swap_enabled {
        if let Some(replacement) = rules.simple_swap.replacement_for(sound_id) {
            return Decision::Replace(Replacement::Host {
                sound_id: replacement,
            });
        }
    }

    if rules.custom_enabled {
        if let Some(clip) = snapshot.sounds.get(&sound_id) {
            return Decision::Replace(Replacement::Custom {
                clip: Arc::clone(clip),
                volume: rules.volume_override,
            });
        }
    }

    if rules.consume_all || rules.blacklist.contains(sound_id) {
        if !rules.whitelist.is_empty() && rules.whitelist.contains(sound_id) {
            return Decision::Pass;
        }
        return Decision::Consume;
    }

    Decision::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::{ClipFormat, CustomSoundMap};
    use crate::ids::IdSet;
    use crate::rules::{RuleConfig, SimpleSwapMap};

    fn clip() -> Arc<SoundClip> {
        let format = ClipFormat {
            sample_rate: 8_000,
            channels: 1,
            source_bits: 16,
        };
        Arc::new(SoundClip::new(vec![0; 16], format).unwrap())
    }

    fn snapshot(rules: RuleConfig, custom: &[u32]) -> RuleSnapshot {
        let sounds: CustomSoundMap = custom.iter().map(|&id| (id, clip())).collect();
        RuleSnapshot {
            rules,
            sounds: Arc::new(sounds),
        }
    }

    #[test]
    fn test_consume_all_respects_whitelist() {
        let rules = RuleConfig {
            consume_all: true,
            whitelist: IdSet::parse("5"),
            ..RuleConfig::default()
        };
        let snapshot = snapshot(rules, &[]);

        assert!(matches!(decide(5, &snapshot), Decision::Pass));
        assert!(matches!(decide(6, &snapshot), Decision::Consume));
    }

    #[test]
    fn test_blacklist_without_whitelist() {
        let rules = RuleConfig {
            blacklist: IdSet::parse("9"),
            ..RuleConfig::default()
        };
        let snapshot = snapshot(rules, &[]);

        assert!(matches!(decide(9, &snapshot), Decision::Consume));
        assert!(matches!(decide(10, &snapshot), Decision::Pass));
    }

    #[test]
    fn test_whitelist_beats_blacklist_for_same_id() {
        let rules = RuleConfig {
            blacklist: IdSet::parse("4"),
            whitelist: IdSet::parse("4"),
            ..RuleConfig::default()
        };
        assert!(matches!(decide(4, &snapshot(rules, &[])), Decision::Pass));
    }

    #[test]
    fn test_whitelist_alone_never_consumes() {
        let rules = RuleConfig {
            whitelist: IdSet::parse("1,2"),
            ..RuleConfig::default()
        };
        let snapshot = snapshot(rules, &[]);
        assert!(matches!(decide(1, &snapshot), Decision::Pass));
        assert!(matches!(decide(3, &snapshot), Decision::Pass));
    }

    #[test]
    fn test_custom_beats_blacklist() {
        let rules = RuleConfig {
            custom_enabled: true,
            blacklist: IdSet::parse("3"),
            volume_override: Some(Volume::new(40)),
            ..RuleConfig::default()
        };

        match decide(3, &snapshot(rules, &[3])) {
            Decision::Replace(Replacement::Custom { volume, .. }) => {
                assert_eq!(volume, Some(Volume::new(40)));
            }
            other => panic!("expected custom replacement, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_disabled_falls_through() {
        let rules = RuleConfig {
            custom_enabled: false,
            blacklist: IdSet::parse("3"),
            ..RuleConfig::default()
        };
        assert!(matches!(decide(3, &snapshot(rules, &[3])), Decision::Consume));
    }

    #[test]
    fn test_simple_swap_beats_custom() {
        let rules = RuleConfig {
            custom_enabled: true,
            simple_swap_enabled: true,
            simple_swap: SimpleSwapMap::parse("3", "30"),
            ..RuleConfig::default()
        };

        assert!(matches!(
            decide(3, &snapshot(rules, &[3])),
            Decision::Replace(Replacement::Host { sound_id: 30 })
        ));
    }

    #[test]
    fn test_simple_swap_without_replacement_falls_through() {
        let rules = RuleConfig {
            consume_all: true,
            simple_swap_enabled: true,
            simple_swap: SimpleSwapMap::parse("3, 4", "30"),
            ..RuleConfig::default()
        };
        let snapshot = snapshot(rules, &[]);

        assert!(matches!(
            decide(3, &snapshot),
            Decision::Replace(Replacement::Host { sound_id: 30 })
        ));
        assert!(matches!(decide(4, &snapshot), Decision::Consume));
    }

    #[test]
    fn test_simple_swap_disabled_is_ignored() {
        let rules = RuleConfig {
            simple_swap_enabled: false,
            simple_swap: SimpleSwapMap::parse("3", "30"),
            ..RuleConfig::default()
        };
        assert!(matches!(decide(3, &snapshot(rules, &[])), Decision::Pass));
    }

    #[test]
    fn test_consumes_flag() {
        assert!(!Decision::Pass.consumes());
        assert!(Decision::Consume.consumes());
        assert!(Decision::Replace(Replacement::Host { sound_id: 1 }).consumes());
    }
}
