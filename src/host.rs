/// The host application's side of the swapper
///
/// The host delivers cue events and honours the consumed flag itself; these
/// are the calls the swapper makes back into it.

pub trait HostAudio: Send + Sync {
    /// Play a host-native sound effect. `None` uses the host's own volume.
    fn play_sound_effect(&self, sound_id: u32, volume: Option<u8>);

    /// Reload the current scene so ambient sounds are re-registered
    fn request_scene_reload(&self) {}

    /// Drop every ambient sound in the loaded scene
    fn clear_ambient_sounds(&self) {}
}
