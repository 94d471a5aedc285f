use crossbeam_channel::{Receiver, bounded};
use hound::{SampleFormat, WavReader};
use rodio::{Decoder, Source};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};

use crate::error::LoadError;

/// A fully decoded track, interleaved `f32` in [-1, 1].
#[derive(Clone, Debug)]
pub struct DecodedTrack {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Arc<[f32]>,
    pub duration_sec: f32,
}

impl DecodedTrack {
    pub fn from_interleaved(
        sample_rate: u32,
        channels: u16,
        samples: Vec<f32>,
    ) -> Result<Self, LoadError> {
        if channels == 0 || sample_rate == 0 || samples.len() < channels as usize {
            return Err(LoadError::Empty);
        }
        let frames = samples.len() / channels as usize;
        Ok(Self {
            sample_rate,
            channels,
            duration_sec: frames as f32 / sample_rate as f32,
            samples: samples.into(),
        })
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }
}

/// Reads the file's raw bytes and decodes them.
pub fn load<P: AsRef<Path>>(path: P) -> Result<DecodedTrack, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Fetch {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "fetched audio");
    decode(bytes)
}

/// WAV goes through hound, everything else through rodio's decoders.
pub fn decode(bytes: Vec<u8>) -> Result<DecodedTrack, LoadError> {
    if bytes.starts_with(b"RIFF") {
        decode_wav(bytes)
    } else {
        decode_compressed(bytes)
    }
}

/// Loads on a background thread; the receiver yields exactly one result.
pub fn spawn_loader(path: PathBuf) -> Receiver<Result<DecodedTrack, LoadError>> {
    let (tx, rx) = bounded(1);
    thread::spawn(move || {
        let result = load(&path);
        if let Err(e) = &result {
            error!("Error loading audio from {}: {e}", path.display());
        }
        let _ = tx.send(result);
    });
    rx
}

fn decode_wav(bytes: Vec<u8>) -> Result<DecodedTrack, LoadError> {
    let mut reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, bits @ 8..=32) => {
            let scale = 1.0 / (1u64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 * scale))
                .collect::<Result<Vec<_>, _>>()?
        }
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        (format, bits) => {
            return Err(LoadError::UnsupportedWav(format!(
                "{bits}-bit {format:?} samples"
            )));
        }
    };

    DecodedTrack::from_interleaved(spec.sample_rate, spec.channels, samples)
}

fn decode_compressed(bytes: Vec<u8>) -> Result<DecodedTrack, LoadError> {
    let decoder = Decoder::new(Cursor::new(bytes))?;
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples = decoder.map(|s| s as f32 / i16::MAX as f32).collect();
    DecodedTrack::from_interleaved(sample_rate, channels, samples)
}
