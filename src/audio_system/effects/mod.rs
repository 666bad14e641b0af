/// Playback effects
///
/// The only effect applied to a replacement clip is an optional gain
/// override derived from a 0-100 volume percentage.

pub mod volume;

pub use volume::Volume;
