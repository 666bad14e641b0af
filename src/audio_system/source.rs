/// Cue categories
///
/// Point cues are non-positional; area cues carry a world origin and an
/// audible range. Each category owns its own rules and sound cache.
use std::fmt;

/// Cue categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueCategory {
    /// Non-positional sound effect
    Point,

    /// Positional sound effect with an audible range
    Area,
}

impl fmt::Display for CueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CueCategory::Point => write!(f, "Sound Effect"),
            CueCategory::Area => write!(f, "Area Sound Effect"),
        }
    }
}

impl CueCategory {
    pub const ALL: [CueCategory; 2] = [CueCategory::Point, CueCategory::Area];

    /// Short tag used in debug lines
    pub fn tag(&self) -> &'static str {
        match self {
            CueCategory::Point => "G",
            CueCategory::Area => "A",
        }
    }

    /// Whether events of this category carry positions
    pub fn is_positional(&self) -> bool {
        matches!(self, CueCategory::Area)
    }
}
