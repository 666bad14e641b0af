/// Audibility of area cues
///
/// Used only to annotate debug output; decisions never depend on it.
use crate::cue::{CueEvent, ScenePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audibility {
    /// Listener is within the cue's range
    Audible,
    /// Listener is out of range; the host plays it silently
    Silent,
}

/// Audibility of a cue at `origin` with `range`, heard from `listener`
pub fn audibility(listener: ScenePoint, origin: ScenePoint, range: u32) -> Audibility {
    if listener.manhattan_distance(&origin) > range as u64 {
        Audibility::Silent
    } else {
        Audibility::Audible
    }
}

/// Audibility of an area event, or None when positions are missing
pub fn classify(event: &CueEvent) -> Option<Audibility> {
    if !event.category.is_positional() {
        return None;
    }

    match (event.listener, event.origin, event.range) {
        (Some(listener), Some(origin), Some(range)) => Some(audibility(listener, origin, range)),
        _ => None,
    }
}
