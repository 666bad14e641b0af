// Integration tests for the sound swapper
// These drive the public API end to end with WAV fixtures on disk

use std::path::Path;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use sound_swapper::audio_system::RebuildOutcome;
use sound_swapper::{
    AudioError, CueCategory, CueEvent, CuePlayer, Decision, HostAudio, Replacement, ScenePoint,
    SoundClip, SoundSwapper, SwapperConfig, SwapperEvent, Volume,
};

const WAIT: Duration = Duration::from_secs(10);

/// Writes `<id>.wav` with `frames` frames at the given bit depth
fn write_wav(dir: &Path, id: u32, frames: usize, bits: u16) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 22_050,
        bits_per_sample: bits,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(dir.join(format!("{}.wav", id)), spec).unwrap();
    for _ in 0..frames * 2 {
        writer.write_sample(1i32).unwrap();
    }
    writer.finalize().unwrap();
}

#[derive(Default)]
struct FakePlayer {
    played: Mutex<Vec<(usize, Option<Volume>)>>,
    device_lost: Mutex<bool>,
}

impl CuePlayer for FakePlayer {
    fn play(&self, clip: Arc<SoundClip>, volume: Option<Volume>) -> Result<(), AudioError> {
        if *self.device_lost.lock().unwrap() {
            return Err(AudioError::DeviceUnavailable);
        }
        self.played.lock().unwrap().push((clip.frames(), volume));
        Ok(())
    }
}

#[derive(Default)]
struct FakeHost {
    played: Mutex<Vec<u32>>,
}

impl HostAudio for FakeHost {
    fn play_sound_effect(&self, sound_id: u32, _volume: Option<u8>) {
        self.played.lock().unwrap().push(sound_id);
    }
}

fn base_config(dir: &Path) -> SwapperConfig {
    SwapperConfig {
        sound_dir: Some(dir.to_path_buf()),
        ..SwapperConfig::default()
    }
}

fn custom_ids(swapper: &SoundSwapper, category: CueCategory) -> Vec<u32> {
    let mut ids: Vec<u32> = swapper.snapshot(category).sounds.keys().copied().collect();
    ids.sort_unstable();
    ids
}

#[test]
fn test_precedence_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(dir.path(), 3, 100, 16);
    write_wav(dir.path(), 7, 50, 16);

    let mut config = base_config(dir.path());
    config.enable_custom_sounds = true;
    config.custom_sounds = "3, 7".to_string();
    config.blacklist_sounds = "3, 9".to_string();
    config.simple_id_swap_enabled = true;
    config.simple_source_ids = "7".to_string();
    config.simple_replacement_ids = "70".to_string();

    let player = Arc::new(FakePlayer::default());
    let host = Arc::new(FakeHost::default());
    let swapper = SoundSwapper::start(config, player.clone(), host.clone());

    // Custom beats blacklist
    let outcome = swapper.on_cue(&CueEvent::point(3));
    assert!(matches!(
        outcome.decision,
        Decision::Replace(Replacement::Custom { .. })
    ));

    // Simple swap beats custom
    let outcome = swapper.on_cue(&CueEvent::point(7));
    assert!(matches!(
        outcome.decision,
        Decision::Replace(Replacement::Host { sound_id: 70 })
    ));

    assert!(swapper.on_cue(&CueEvent::point(9)).consumed);
    assert!(!swapper.on_cue(&CueEvent::point(10)).consumed);

    assert_eq!(*player.played.lock().unwrap(), vec![(100, None)]);
    assert_eq!(*host.played.lock().unwrap(), vec![70]);
}

#[test]
fn test_consume_all_with_whitelist() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = base_config(dir.path());
    config.consume_area_sounds = true;
    config.whitelist_area_sounds = "5".to_string();

    let swapper = SoundSwapper::start(
        config,
        Arc::new(FakePlayer::default()),
        Arc::new(FakeHost::default()),
    );

    let origin = ScenePoint::new(0, 0);
    assert!(!swapper.on_cue(&CueEvent::area(5, origin, origin, 1)).consumed);
    assert!(swapper.on_cue(&CueEvent::area(6, origin, origin, 1)).consumed);
    // Point rules are untouched
    assert!(!swapper.on_cue(&CueEvent::point(6)).consumed);
}

#[test]
fn test_wider_wav_formats_are_converted() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(dir.path(), 1, 40, 24);
    write_wav(dir.path(), 2, 40, 8);

    let mut config = base_config(dir.path());
    config.enable_custom_area_sounds = true;
    config.custom_area_sounds = "1,2".to_string();

    let swapper = SoundSwapper::start(
        config,
        Arc::new(FakePlayer::default()),
        Arc::new(FakeHost::default()),
    );

    let snapshot = swapper.snapshot(CueCategory::Area);
    assert_eq!(custom_ids(&swapper, CueCategory::Area), vec![1, 2]);
    for clip in snapshot.sounds.values() {
        assert_eq!(clip.format().channels, 2);
        assert_eq!(clip.format().sample_rate, 22_050);
        assert_eq!(clip.frames(), 40);
    }
}

#[test]
fn test_reload_same_list_releases_previous_clips() {
    let dir = tempfile::tempdir().unwrap();
    for id in 1..=3 {
        write_wav(dir.path(), id, 10, 16);
    }

    let mut config = base_config(dir.path());
    config.custom_sounds = "1,2,3".to_string();
    let swapper = SoundSwapper::start(
        config,
        Arc::new(FakePlayer::default()),
        Arc::new(FakeHost::default()),
    );

    let first: Vec<Weak<SoundClip>> = swapper
        .snapshot(CueCategory::Point)
        .sounds
        .values()
        .map(Arc::downgrade)
        .collect();

    let ticket = swapper
        .on_config_changed("custom-sounds", "1,2,3")
        .unwrap();
    assert_eq!(
        ticket.wait(WAIT),
        Some(RebuildOutcome::Installed {
            loaded: 3,
            requested: 3
        })
    );

    assert_eq!(custom_ids(&swapper, CueCategory::Point), vec![1, 2, 3]);
    assert!(first.iter().all(|clip| clip.upgrade().is_none()));
}

#[test]
fn test_latest_sound_list_wins() {
    let dir = tempfile::tempdir().unwrap();
    for id in 1..=4 {
        write_wav(dir.path(), id, 10, 16);
    }

    let swapper = SoundSwapper::start(
        base_config(dir.path()),
        Arc::new(FakePlayer::default()),
        Arc::new(FakeHost::default()),
    );

    let a = swapper.on_config_changed("custom-sounds", "1,2,3").unwrap();
    let b = swapper.on_config_changed("custom-sounds", "4").unwrap();

    assert!(a.wait(WAIT).is_some());
    assert!(matches!(
        b.wait(WAIT),
        Some(RebuildOutcome::Installed { .. })
    ));
    assert_eq!(custom_ids(&swapper, CueCategory::Point), vec![4]);
}

#[test]
fn test_device_loss_keeps_cue_consumed() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(dir.path(), 12, 10, 16);

    let mut config = base_config(dir.path());
    config.enable_custom_sounds = true;
    config.custom_sounds = "12".to_string();

    let player = Arc::new(FakePlayer::default());
    *player.device_lost.lock().unwrap() = true;
    let swapper = SoundSwapper::start(config, player.clone(), Arc::new(FakeHost::default()));
    let (events, _id) = swapper.subscribe();

    assert!(swapper.on_cue(&CueEvent::point(12)).consumed);
    assert!(player.played.lock().unwrap().is_empty());

    let failures: Vec<SwapperEvent> = events
        .try_iter()
        .filter(|event| matches!(event, SwapperEvent::PlaybackFailed { .. }))
        .collect();
    assert_eq!(failures.len(), 1);
}

#[test]
fn test_missing_sound_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let sounds = dir.path().join("nested").join("sounds");

    let swapper = SoundSwapper::start(
        base_config(&sounds),
        Arc::new(FakePlayer::default()),
        Arc::new(FakeHost::default()),
    );

    assert!(sounds.is_dir());
    assert!(!swapper.on_cue(&CueEvent::point(1)).consumed);
}

#[test]
fn test_shutdown_releases_clips_during_playback() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(dir.path(), 1, 10, 16);

    let mut config = base_config(dir.path());
    config.enable_custom_sounds = true;
    config.custom_sounds = "1".to_string();

    let swapper = SoundSwapper::start(
        config,
        Arc::new(FakePlayer::default()),
        Arc::new(FakeHost::default()),
    );

    // A replacement handed to the player stays valid after shutdown
    let outcome = swapper.on_cue(&CueEvent::point(1));
    let Decision::Replace(Replacement::Custom { clip, .. }) = outcome.decision else {
        panic!("expected custom replacement");
    };
    let weak = Arc::downgrade(&clip);

    swapper.shutdown();
    assert!(swapper.snapshot(CueCategory::Point).sounds.is_empty());
    assert_eq!(clip.frames(), 10);

    drop(clip);
    assert!(weak.upgrade().is_none());
}
