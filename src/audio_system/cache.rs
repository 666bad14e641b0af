/// Custom sound cache
///
/// Rebuilds a category's id -> clip map from configuration text. Passes run
/// on the `sound-loader` thread; a finished pass is installed into the
/// category state in one swap, and only if no newer pass was requested in
/// the meantime.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::Mutex;

use super::clip::SoundClip;
use crate::error::AudioError;
use crate::ids::IdSet;
use crate::messaging::{EventBus, SwapperEvent};
use crate::state::CategoryState;

/// Installed custom clips, keyed by cue id
pub type CustomSoundMap = HashMap<u32, Arc<SoundClip>>;

/// Result of one rebuild pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// The pass finished and its map is now live
    Installed { loaded: usize, requested: usize },

    /// A newer pass (or shutdown) made this one stale; nothing was installed
    Superseded,
}

/// Handle to a queued rebuild pass
pub struct RebuildTicket {
    generation: u64,
    done: Receiver<RebuildOutcome>,
}

impl RebuildTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the pass to finish
    pub fn wait(&self, timeout: Duration) -> Option<RebuildOutcome> {
        self.done.recv_timeout(timeout).ok()
    }
}

struct RebuildJob {
    state: Arc<CategoryState>,
    generation: u64,
    config_text: String,
    done: Sender<RebuildOutcome>,
}

/// Loader for `<id>.wav` files in one sound directory
pub struct SoundCache {
    sound_dir: PathBuf,
    events: Option<EventBus>,
    stopped: Arc<AtomicBool>,
    jobs: Mutex<Option<Sender<RebuildJob>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SoundCache {
    /// Create a cache reading from `sound_dir` and start its loader thread
    pub fn new(sound_dir: PathBuf) -> Self {
        Self::spawn(sound_dir, None)
    }

    /// Like `new`, publishing `SoundsInstalled` on `events` after each install
    pub fn with_events(sound_dir: PathBuf, events: EventBus) -> Self {
        Self::spawn(sound_dir, Some(events))
    }

    fn spawn(sound_dir: PathBuf, events: Option<EventBus>) -> Self {
        let (tx, rx) = unbounded::<RebuildJob>();
        let dir = sound_dir.clone();
        let worker_events = events.clone();
        let stopped = Arc::new(AtomicBool::new(false));
        let worker_stopped = Arc::clone(&stopped);

        let worker = thread::Builder::new()
            .name("sound-loader".to_string())
            .spawn(move || {
                tracing::debug!("Sound loader thread started");
                while let Ok(job) = rx.recv() {
                    let outcome = run_rebuild(
                        &dir,
                        worker_events.as_ref(),
                        &worker_stopped,
                        &job.state,
                        job.generation,
                        &job.config_text,
                    );
                    let _ = job.done.send(outcome);
                }
                tracing::debug!("Sound loader thread stopped");
            });

        let (jobs, worker) = match worker {
            Ok(handle) => (Some(tx), Some(handle)),
            Err(err) => {
                tracing::error!("Failed to start sound loader thread: {}", err);
                (None, None)
            }
        };

        Self {
            sound_dir,
            events,
            stopped,
            jobs: Mutex::new(jobs),
            worker: Mutex::new(worker),
        }
    }

    pub fn sound_dir(&self) -> &Path {
        &self.sound_dir
    }

    /// Queue a rebuild of `state`'s sounds from `config_text`.
    ///
    /// Any pass already queued or running for the category becomes stale.
    pub fn rebuild(&self, state: &Arc<CategoryState>, config_text: &str) -> RebuildTicket {
        let generation = state.begin_rebuild();
        let (done_tx, done_rx) = bounded(1);

        let job = RebuildJob {
            state: Arc::clone(state),
            generation,
            config_text: config_text.to_string(),
            done: done_tx,
        };

        let rejected = match self.jobs.lock().as_ref() {
            Some(tx) => tx.send(job).err().map(|err| err.into_inner()),
            None => Some(job),
        };

        if let Some(job) = rejected {
            tracing::debug!(
                "Sound loader stopped, dropping {} rebuild",
                job.state.category()
            );
            let _ = job.done.send(RebuildOutcome::Superseded);
        }

        RebuildTicket {
            generation,
            done: done_rx,
        }
    }

    /// Run a rebuild pass on the calling thread
    pub fn rebuild_blocking(&self, state: &CategoryState, config_text: &str) -> RebuildOutcome {
        let generation = state.begin_rebuild();
        run_rebuild(
            &self.sound_dir,
            self.events.as_ref(),
            &self.stopped,
            state,
            generation,
            config_text,
        )
    }

    /// Stop the loader thread.
    ///
    /// Queued passes finish as `Superseded` without decoding anything, and a
    /// pass in progress stops at its next file.
    pub fn shutdown(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.jobs.lock().take();

        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                tracing::warn!("Sound loader thread panicked during shutdown");
            }
        }
    }
}

impl Drop for SoundCache {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Path of the clip for `id`
pub fn sound_path(sound_dir: &Path, id: u32) -> PathBuf {
    sound_dir.join(format!("{}.wav", id))
}

/// Decode the clip for `id`, logging and returning None when unavailable
pub fn load_clip(sound_dir: &Path, id: u32) -> Option<SoundClip> {
    let path = sound_path(sound_dir, id);

    match SoundClip::load(&path) {
        Ok(clip) => {
            tracing::debug!(
                "Loaded custom sound {} ({} bytes, {} Hz, {} ch)",
                id,
                clip.byte_len(),
                clip.format().sample_rate,
                clip.format().channels
            );
            Some(clip)
        }
        Err(AudioError::FileNotFound { path }) => {
            tracing::debug!("No custom sound file for {}: {}", id, path);
            None
        }
        Err(err) => {
            tracing::warn!("Unable to load custom sound {}: {}", id, err);
            None
        }
    }
}

fn run_rebuild(
    sound_dir: &Path,
    events: Option<&EventBus>,
    stopped: &AtomicBool,
    state: &CategoryState,
    generation: u64,
    config_text: &str,
) -> RebuildOutcome {
    let abandoned = || stopped.load(Ordering::SeqCst) || !state.is_current(generation);

    let ids = IdSet::parse(config_text);
    let mut sounds = CustomSoundMap::with_capacity(ids.len());

    for id in ids.iter() {
        if abandoned() {
            tracing::debug!("{} rebuild #{} superseded", state.category(), generation);
            return RebuildOutcome::Superseded;
        }

        if let Some(clip) = load_clip(sound_dir, id) {
            sounds.insert(id, Arc::new(clip));
        }
    }

    if stopped.load(Ordering::SeqCst) {
        tracing::debug!("{} rebuild #{} dropped at shutdown", state.category(), generation);
        return RebuildOutcome::Superseded;
    }

    let loaded = sounds.len();
    if state.install_sounds(generation, sounds) {
        tracing::info!(
            "Installed {} of {} custom {} clips",
            loaded,
            ids.len(),
            state.category()
        );
        if let Some(events) = events {
            events.publish(SwapperEvent::SoundsInstalled {
                category: state.category(),
                loaded,
                requested: ids.len(),
            });
        }
        RebuildOutcome::Installed {
            loaded,
            requested: ids.len(),
        }
    } else {
        tracing::debug!("{} rebuild #{} discarded", state.category(), generation);
        RebuildOutcome::Superseded
    }
}
