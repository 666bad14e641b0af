/// Decoded sound clips
///
/// A clip is the resource handle the cache hands out: interleaved 16-bit
/// PCM plus its format. The sample buffer is shared and immutable; every
/// play takes its own cursor starting at frame 0, so dropping a clip from
/// the cache never disturbs a play already in progress.
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::Source;

use super::decode;
use crate::error::AudioError;

/// Format of a decoded clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipFormat {
    pub sample_rate: u32,
    pub channels: u16,
    /// Bit depth of the file the clip was decoded from
    pub source_bits: u16,
}

/// Decoded audio held in memory
#[derive(Debug)]
pub struct SoundClip {
    samples: Arc<[i16]>,
    format: ClipFormat,
}

impl SoundClip {
    /// Create a clip from interleaved samples
    pub fn new(samples: Vec<i16>, format: ClipFormat) -> Result<Self, AudioError> {
        if format.channels == 0 || format.sample_rate == 0 {
            return Err(AudioError::InvalidFormat(format!(
                "{} channels at {} Hz",
                format.channels, format.sample_rate
            )));
        }

        Ok(Self {
            samples: samples.into(),
            format,
        })
    }

    /// Decode a WAV file from disk
    pub fn load(path: &Path) -> Result<Self, AudioError> {
        decode::decode_wav(path)
    }

    pub fn format(&self) -> ClipFormat {
        self.format
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Length of the PCM data in bytes
    pub fn byte_len(&self) -> usize {
        self.samples.len() * std::mem::size_of::<i16>()
    }

    /// Number of frames (one sample per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.format.channels as usize
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.format.sample_rate as f64)
    }

    /// A fresh playback cursor positioned at the first frame
    pub fn cursor(&self) -> ClipSource {
        ClipSource {
            samples: Arc::clone(&self.samples),
            position: 0,
            format: self.format,
        }
    }
}

/// Playback cursor over a clip's shared samples
pub struct ClipSource {
    samples: Arc<[i16]>,
    position: usize,
    format: ClipFormat,
}

impl Iterator for ClipSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        let sample = self.samples.get(self.position).copied();
        if sample.is_some() {
            self.position += 1;
        }
        sample
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl Source for ClipSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len() - self.position)
    }

    fn channels(&self) -> u16 {
        self.format.channels
    }

    fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let frames = self.samples.len() / self.format.channels as usize;
        Some(Duration::from_secs_f64(
            frames as f64 / self.format.sample_rate as f64,
        ))
    }
}
