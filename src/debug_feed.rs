/// Recent decisions for the debug overlay
///
/// The overlay renders these lines; this module only keeps them. Labels
/// follow the overlay's order: custom, whitelisted, blacklisted, consumed,
/// allowed.
use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;

use crate::audio_system::CueCategory;
use crate::cue::CueEvent;
use crate::distance::{self, Audibility};
use crate::engine::{Decision, Replacement};
use crate::state::RuleSnapshot;

/// Lines kept before the oldest is dropped
pub const MAX_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueLabel {
    Allowed,
    Consumed,
    Blacklisted,
    Whitelisted,
    Custom,
    Swapped,
}

impl fmt::Display for CueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CueLabel::Allowed => "Allowed",
            CueLabel::Consumed => "Consumed",
            CueLabel::Blacklisted => "Blacklisted",
            CueLabel::Whitelisted => "Whitelisted",
            CueLabel::Custom => "Custom",
            CueLabel::Swapped => "Swapped",
        };
        f.write_str(text)
    }
}

/// One handled cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueReport {
    pub category: CueCategory,
    pub sound_id: u32,
    pub audibility: Option<Audibility>,
    pub label: CueLabel,
}

impl CueReport {
    pub fn new(event: &CueEvent, decision: &Decision, snapshot: &RuleSnapshot) -> Self {
        let rules = &snapshot.rules;
        let id = event.sound_id;

        // Labels reflect list membership, not whether a rule is switched on
        let label = if matches!(decision, Decision::Replace(Replacement::Host { .. })) {
            CueLabel::Swapped
        } else if snapshot.sounds.contains_key(&id) {
            CueLabel::Custom
        } else if rules.whitelist.contains(id) {
            CueLabel::Whitelisted
        } else if rules.blacklist.contains(id) {
            CueLabel::Blacklisted
        } else if rules.consume_all {
            CueLabel::Consumed
        } else {
            CueLabel::Allowed
        };

        Self {
            category: event.category,
            sound_id: event.sound_id,
            audibility: distance::classify(event),
            label,
        }
    }

    /// `G` for point cues, `A` for audible area cues, `SA` for silent ones
    pub fn prefix(&self) -> &'static str {
        match self.audibility {
            Some(Audibility::Silent) => "SA",
            _ => self.category.tag(),
        }
    }
}

impl fmt::Display for CueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.prefix(), self.sound_id, self.label)
    }
}

/// Bounded list of recent reports
#[derive(Default)]
pub struct DebugFeed {
    lines: Mutex<VecDeque<CueReport>>,
}

impl DebugFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, report: CueReport) {
        let mut lines = self.lines.lock();
        lines.push_back(report);
        while lines.len() > MAX_LINES {
            lines.pop_front();
        }
    }

    /// Oldest first
    pub fn lines(&self) -> Vec<CueReport> {
        self.lines.lock().iter().cloned().collect()
    }

    pub fn reset(&self) {
        self.lines.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::ScenePoint;
    use crate::ids::IdSet;
    use crate::rules::RuleConfig;

    fn snapshot(rules: RuleConfig) -> RuleSnapshot {
        RuleSnapshot {
            rules,
            sounds: Default::default(),
        }
    }

    #[test]
    fn test_labels() {
        let snapshot = snapshot(RuleConfig {
            consume_all: true,
            whitelist: IdSet::parse("1"),
            blacklist: IdSet::parse("1, 2"),
            ..RuleConfig::default()
        });

        let report = |id, decision: Decision| CueReport::new(&CueEvent::point(id), &decision, &snapshot);

        assert_eq!(report(1, Decision::Pass).label, CueLabel::Whitelisted);
        assert_eq!(report(2, Decision::Consume).label, CueLabel::Blacklisted);
        assert_eq!(report(3, Decision::Consume).label, CueLabel::Consumed);
        assert_eq!(
            report(5, Decision::Replace(Replacement::Host { sound_id: 6 })).label,
            CueLabel::Swapped
        );

        let open = self::snapshot(RuleConfig::default());
        assert_eq!(
            CueReport::new(&CueEvent::point(4), &Decision::Pass, &open).label,
            CueLabel::Allowed
        );
    }

    #[test]
    fn test_custom_label_follows_sound_map() {
        use crate::audio_system::{ClipFormat, SoundClip};
        use std::sync::Arc;

        let format = ClipFormat {
            sample_rate: 8_000,
            channels: 1,
            source_bits: 16,
        };
        let clip = Arc::new(SoundClip::new(vec![0; 4], format).unwrap());
        let snapshot = RuleSnapshot {
            // Custom swapping is off, the clip is still installed
            rules: RuleConfig {
                whitelist: IdSet::parse("9"),
                ..RuleConfig::default()
            },
            sounds: Arc::new([(9, clip)].into_iter().collect()),
        };

        let report = CueReport::new(&CueEvent::point(9), &Decision::Pass, &snapshot);
        assert_eq!(report.label, CueLabel::Custom);
    }

    #[test]
    fn test_prefixes() {
        let snapshot = snapshot(RuleConfig::default());

        let point = CueReport::new(&CueEvent::point(7), &Decision::Pass, &snapshot);
        assert_eq!(point.to_string(), "G: 7 Allowed");

        let near = CueEvent::area(8, ScenePoint::new(1, 1), ScenePoint::new(0, 0), 5);
        assert_eq!(
            CueReport::new(&near, &Decision::Pass, &snapshot).prefix(),
            "A"
        );

        let far = CueEvent::area(8, ScenePoint::new(9, 9), ScenePoint::new(0, 0), 5);
        assert_eq!(
            CueReport::new(&far, &Decision::Consume, &snapshot).to_string(),
            "SA: 8 Consumed"
        );
    }

    #[test]
    fn test_feed_is_bounded() {
        let feed = DebugFeed::new();
        let snapshot = snapshot(RuleConfig::default());

        for id in 0..(MAX_LINES as u32 + 3) {
            feed.push(CueReport::new(&CueEvent::point(id), &Decision::Pass, &snapshot));
        }

        let lines = feed.lines();
        assert_eq!(lines.len(), MAX_LINES);
        assert_eq!(lines[0].sound_id, 3);

        feed.reset();
        assert!(feed.lines().is_empty());
    }
}
