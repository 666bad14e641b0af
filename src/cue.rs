/// Inbound cue notifications
use crate::audio_system::CueCategory;

/// Scene tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScenePoint {
    pub x: i32,
    pub y: i32,
}

impl ScenePoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `|dx| + |dy|`
    pub fn manhattan_distance(&self, other: &ScenePoint) -> u64 {
        (self.x as i64 - other.x as i64).unsigned_abs()
            + (self.y as i64 - other.y as i64).unsigned_abs()
    }
}

/// A cue the host is about to play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueEvent {
    pub category: CueCategory,
    pub sound_id: u32,
    /// Where an area cue originates
    pub origin: Option<ScenePoint>,
    /// Listener position when the cue fired
    pub listener: Option<ScenePoint>,
    /// Audible range of an area cue, in tiles
    pub range: Option<u32>,
}

impl CueEvent {
    /// A non-positional sound effect
    pub fn point(sound_id: u32) -> Self {
        Self {
            category: CueCategory::Point,
            sound_id,
            origin: None,
            listener: None,
            range: None,
        }
    }

    /// An area sound effect heard from `listener`
    pub fn area(sound_id: u32, origin: ScenePoint, listener: ScenePoint, range: u32) -> Self {
        Self {
            category: CueCategory::Area,
            sound_id,
            origin: Some(origin),
            listener: Some(listener),
            range: Some(range),
        }
    }
}
