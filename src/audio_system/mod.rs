pub mod cache;
pub mod clip;
pub mod decode;
pub mod effects;
pub mod player;
/// Audio system module
///
/// Loads replacement clips and plays them back:
/// - Per-category caches of decoded `<id>.wav` clips, rebuilt off-thread
/// - One-shot playback with an optional gain override
///
/// ## Architecture
///
/// ```text
/// SoundCache (sound-loader thread)
///   └── rebuild pass ──> CategoryState::install_sounds (Point | Area)
///                              └── CustomSoundMap: id -> Arc<SoundClip>
///
/// CuePlayer (RodioPlayer, cue-audio thread)
///   └── one Sink per play, fed by SoundClip::cursor()
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use audio_system::{RodioPlayer, SoundCache, CuePlayer};
///
/// let cache = SoundCache::new(sound_dir);
/// let ticket = cache.rebuild(&point_state, "1234, 5678");
///
/// let player = RodioPlayer::spawn();
/// if let Some(clip) = point_state.snapshot().sounds.get(&1234) {
///     player.play(Arc::clone(clip), Some(Volume::new(65)))?;
/// }
/// ```
pub mod source;

// Re-export commonly used types
pub use cache::{CustomSoundMap, RebuildOutcome, RebuildTicket, SoundCache};
pub use clip::{ClipFormat, ClipSource, SoundClip};
pub use effects::Volume;
pub use player::{CuePlayer, RodioPlayer};
pub use source::CueCategory;
