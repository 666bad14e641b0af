/// WAV decoding into in-memory clips
///
/// hound handles the common PCM layouts. Files hound refuses (extensible
/// headers with unusual layouts, odd chunk orderings) get a second attempt
/// through symphonia before the id is given up on.
use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::clip::{ClipFormat, SoundClip};
use crate::error::AudioError;

/// Decode a WAV file into a clip of interleaved 16-bit samples
pub fn decode_wav(path: &Path) -> Result<SoundClip, AudioError> {
    if !path.is_file() {
        return Err(AudioError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    match decode_with_hound(path) {
        Ok(clip) => Ok(clip),
        Err(hound::Error::IoError(err)) => Err(AudioError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(err),
        }),
        Err(err) => {
            tracing::debug!(
                "hound could not read {} ({}), retrying with symphonia",
                path.display(),
                err
            );
            decode_with_symphonia(path)
        }
    }
}

fn decode_with_hound(path: &Path) -> Result<SoundClip, hound::Error> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, bits) if bits <= 8 => reader
            .samples::<i8>()
            .map(|s| s.map(|s| (s as i16) << 8))
            .collect::<Result<_, _>>()?,
        (hound::SampleFormat::Int, bits) if bits <= 16 => {
            reader.samples::<i16>().collect::<Result<_, _>>()?
        }
        (hound::SampleFormat::Int, bits) => {
            let shift = bits.saturating_sub(16) as u32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| (s >> shift) as i16))
                .collect::<Result<_, _>>()?
        }
        (hound::SampleFormat::Float, _) => reader
            .samples::<f32>()
            .map(|s| s.map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<Result<_, _>>()?,
    };

    let format = ClipFormat {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        source_bits: spec.bits_per_sample,
    };

    SoundClip::new(samples, format).map_err(|_| hound::Error::FormatError("empty format"))
}

fn decode_with_symphonia(path: &Path) -> Result<SoundClip, AudioError> {
    let decode_failed = |source: Box<dyn std::error::Error + Send + Sync>| AudioError::DecodeFailed {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).map_err(|err| AudioError::LoadFailed {
        path: path.display().to_string(),
        source: Box::new(err),
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("wav");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| decode_failed(Box::new(err)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::InvalidFormat("no decodable audio track".to_string()))?;
    let track_id = track.id;
    let source_bits = track.codec_params.bits_per_sample.unwrap_or(16) as u16;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| decode_failed(Box::new(err)))?;

    let mut samples: Vec<i16> = Vec::new();
    let mut signal = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            // A WAV file has a single fixed track list
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(decode_failed(Box::new(err))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                signal.get_or_insert(spec);
                let mut buffer = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::DecodeError(_)) => {
                // Skip the damaged packet
                continue;
            }
            Err(err) => return Err(decode_failed(Box::new(err))),
        }
    }

    let spec = signal.ok_or_else(|| AudioError::InvalidFormat("no audio frames".to_string()))?;

    SoundClip::new(
        samples,
        ClipFormat {
            sample_rate: spec.rate,
            channels: spec.channels.count() as u16,
            source_bits,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, spec: hound::WavSpec, frames: usize) {
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames * spec.channels as usize {
            match (spec.sample_format, spec.bits_per_sample) {
                (hound::SampleFormat::Float, _) => writer.write_sample(0.5f32).unwrap(),
                (_, 16) => writer.write_sample((i % 100) as i16).unwrap(),
                (_, 24) => writer.write_sample(0x10_0000i32).unwrap(),
                _ => writer.write_sample(1i8).unwrap(),
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_16_bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        write_wav(&path, spec, 100);

        let clip = decode_wav(&path).unwrap();
        assert_eq!(clip.format().channels, 2);
        assert_eq!(clip.format().sample_rate, 22_050);
        assert_eq!(clip.format().source_bits, 16);
        assert_eq!(clip.frames(), 100);
        assert_eq!(clip.byte_len(), 400);
        assert_eq!(clip.samples()[5], 5);
    }

    #[test]
    fn test_decode_24_bit_downconverts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 24,
            sample_format: hound::SampleFormat::Int,
        };
        write_wav(&path, spec, 10);

        let clip = decode_wav(&path).unwrap();
        assert_eq!(clip.samples()[0], 0x1000);
        assert_eq!(clip.format().source_bits, 24);
    }

    #[test]
    fn test_decode_float() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("3.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 48_000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        write_wav(&path, spec, 4);

        let clip = decode_wav(&path).unwrap();
        assert_eq!(clip.samples()[0], (0.5 * i16::MAX as f32) as i16);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = decode_wav(&dir.path().join("404.wav"));
        assert!(matches!(result, Err(AudioError::FileNotFound { .. })));
    }

    #[test]
    fn test_garbage_file_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("5.wav");
        std::fs::write(&path, b"definitely not a riff header").unwrap();

        let result = decode_wav(&path);
        assert!(matches!(
            result,
            Err(AudioError::DecodeFailed { .. }) | Err(AudioError::InvalidFormat(_))
        ));
    }
}
