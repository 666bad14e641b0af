/// One-shot playback of replacement clips
///
/// `RodioPlayer` owns the output stream on a dedicated `cue-audio` thread
/// (rodio's stream is not `Send`). Callers hand it play requests over a
/// channel and return immediately; each request gets its own sink and its
/// own cursor into the clip.
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use rodio::{OutputStream, Sink};

use super::clip::SoundClip;
use super::effects::Volume;
use crate::error::AudioError;

/// Plays replacement clips without blocking the caller
pub trait CuePlayer: Send + Sync {
    /// Start `clip` from its first frame. `volume` overrides the device gain.
    fn play(&self, clip: Arc<SoundClip>, volume: Option<Volume>) -> Result<(), AudioError>;

    /// Stop everything and release the output device
    fn shutdown(&self) {}
}

enum AudioRequest {
    Play {
        clip: Arc<SoundClip>,
        volume: Option<Volume>,
    },
    StopAll,
}

/// rodio-backed player
pub struct RodioPlayer {
    requests: Mutex<Option<Sender<AudioRequest>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RodioPlayer {
    /// Spawn the audio thread. Without an output device the player is
    /// muted and every play reports `DeviceUnavailable`.
    pub fn spawn() -> Self {
        match Self::try_spawn() {
            Ok(player) => player,
            Err(err) => {
                tracing::warn!("{:#}, custom sounds are muted", anyhow::Error::new(err));
                Self {
                    requests: Mutex::new(None),
                    worker: Mutex::new(None),
                }
            }
        }
    }

    /// Spawn the audio thread and wait until its output stream is open
    pub fn try_spawn() -> Result<Self, AudioError> {
        let (tx, rx) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);

        let worker = thread::Builder::new()
            .name("cue-audio".to_string())
            .spawn(move || run_output(rx, ready_tx))
            .map_err(|err| AudioError::StreamInitFailed(Box::new(err)))?;

        let ready = ready_rx
            .recv()
            .unwrap_or(Err(AudioError::DeviceUnavailable));
        if let Err(err) = ready {
            let _ = worker.join();
            return Err(err);
        }

        Ok(Self {
            requests: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Stop every clip that is still playing
    pub fn stop_all(&self) {
        if let Some(tx) = self.requests.lock().as_ref() {
            let _ = tx.send(AudioRequest::StopAll);
        }
    }
}

impl CuePlayer for RodioPlayer {
    fn play(&self, clip: Arc<SoundClip>, volume: Option<Volume>) -> Result<(), AudioError> {
        let requests = self.requests.lock();
        let tx = requests.as_ref().ok_or(AudioError::DeviceUnavailable)?;

        tx.send(AudioRequest::Play { clip, volume })
            .map_err(|_| AudioError::DeviceUnavailable)
    }

    fn shutdown(&self) {
        // Dropping the sender ends the audio thread's receive loop
        self.requests.lock().take();

        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                tracing::warn!("Audio thread panicked during shutdown");
            }
        }
    }
}

impl Drop for RodioPlayer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_output(rx: Receiver<AudioRequest>, ready: Sender<Result<(), AudioError>>) {
    let (_stream, stream_handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(err) => {
            let _ = ready.send(Err(AudioError::StreamInitFailed(Box::new(err))));
            return;
        }
    };
    let _ = ready.send(Ok(()));
    tracing::debug!("Audio output stream opened");

    let mut active: Vec<Sink> = Vec::new();

    while let Ok(request) = rx.recv() {
        // Finished sinks are released here
        active.retain(|sink| !sink.empty());

        match request {
            AudioRequest::Play { clip, volume } => match Sink::try_new(&stream_handle) {
                Ok(sink) => {
                    if let Some(volume) = volume {
                        sink.set_volume(volume.amplitude());
                    }
                    sink.append(clip.cursor());
                    sink.play();
                    active.push(sink);
                }
                Err(err) => {
                    let err = AudioError::PlaybackFailed(Box::new(err));
                    tracing::warn!("{:#}, skipping clip", anyhow::Error::new(err));
                }
            },
            AudioRequest::StopAll => {
                for sink in active.drain(..) {
                    sink.stop();
                }
            }
        }
    }

    for sink in active {
        sink.stop();
    }
    tracing::debug!("Audio output stream closed");
}
