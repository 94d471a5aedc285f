use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use rodio::Source;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::track::DecodedTrack;

/// Builds a one-shot playable source for `track` plus the reader the
/// analysis side pulls its windows from.
pub fn tap(track: &DecodedTrack, window_size: usize) -> (TapSource, TapReader) {
    // 8x window_size so a slow frame never stalls playback
    let (viz_prod, viz_cons) = HeapRb::<f32>::new(window_size * 8).split();
    let ended = Arc::new(AtomicBool::new(false));

    let source = TapSource {
        samples: Arc::clone(&track.samples),
        pos: 0,
        channels: track.channels,
        sample_rate: track.sample_rate,
        frame_sum: 0.0,
        viz_prod,
        ended: Arc::clone(&ended),
    };
    let reader = TapReader {
        consumer: viz_cons,
        window: VecDeque::from(vec![0.0f32; window_size]),
        ended,
    };
    (source, reader)
}

/// Plays the decoded buffer once from the start. Every frame that gets
/// played is also forwarded, mixed to mono, to the analysis ring buffer so
/// the spectrum follows what is being heard.
pub struct TapSource {
    samples: Arc<[f32]>,
    pos: usize,
    channels: u16,
    sample_rate: u32,
    frame_sum: f32,
    viz_prod: HeapProducer<f32>,
    ended: Arc<AtomicBool>,
}

impl Iterator for TapSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let Some(&s) = self.samples.get(self.pos) else {
            self.ended.store(true, Ordering::Release);
            return None;
        };
        self.pos += 1;
        self.frame_sum += s;
        if self.pos % self.channels as usize == 0 {
            let _ = self.viz_prod.push(self.frame_sum / self.channels as f32);
            self.frame_sum = 0.0;
        }
        Some(s)
    }
}

impl Source for TapSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }
    fn channels(&self) -> u16 {
        self.channels
    }
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
    fn total_duration(&self) -> Option<Duration> {
        let frames = self.samples.len() / self.channels as usize;
        Some(Duration::from_secs_f64(frames as f64 / self.sample_rate as f64))
    }
}

/// Analysis end of a tap.
pub struct TapReader {
    consumer: HeapConsumer<f32>,
    window: VecDeque<f32>, // sliding window of the latest `size` samples
    ended: Arc<AtomicBool>,
}

impl TapReader {
    /// Drains newly played samples into the sliding window, then copies the
    /// latest `size` samples into `out`.
    pub fn read_window(&mut self, out: &mut Vec<f32>, size: usize) {
        while let Some(s) = self.consumer.pop() {
            self.window.push_back(s);
            if self.window.len() > size {
                self.window.pop_front();
            }
        }
        out.clear();
        out.extend(self.window.iter().copied());
        // pad with silence if the window is still filling
        while out.len() < size {
            out.insert(0, 0.0);
        }
    }

    /// Set once the source has played its last sample.
    pub fn has_ended(&self) -> bool {
        self.ended.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(channels: u16, samples: Vec<f32>) -> DecodedTrack {
        DecodedTrack::from_interleaved(1_000, channels, samples).unwrap()
    }

    #[test]
    fn plays_every_sample_once_then_ends() {
        let t = track(1, vec![0.1, 0.2, 0.3]);
        let (source, reader) = tap(&t, 4);
        let secs = source.total_duration().unwrap().as_secs_f64();
        assert!((secs - 0.003).abs() < 1e-6);
        assert!(!reader.has_ended());

        let played: Vec<f32> = source.collect();
        assert_eq!(played, vec![0.1, 0.2, 0.3]);
        assert!(reader.has_ended());
    }

    #[test]
    fn forwards_mono_mix_of_each_frame() {
        let t = track(2, vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0]);
        let (source, mut reader) = tap(&t, 3);
        let _ = source.count();

        let mut out = Vec::new();
        reader.read_window(&mut out, 3);
        assert_eq!(out, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn window_keeps_only_latest_samples() {
        let t = track(1, (0..10).map(|i| i as f32).collect());
        let (mut source, mut reader) = tap(&t, 4);
        let mut out = Vec::new();

        for _ in 0..2 {
            source.next();
        }
        reader.read_window(&mut out, 4);
        assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0]);

        for _ in 0..6 {
            source.next();
        }
        reader.read_window(&mut out, 4);
        assert_eq!(out, vec![4.0, 5.0, 6.0, 7.0]);
    }
}
