use rustfft::{FftPlanner, num_complex::Complex32};
use std::f32::consts::PI;

/// Samples per analysis window.
pub const FFT_SIZE: usize = 512;

/// Turns a window of mono samples into one byte per frequency bin, the way a
/// browser analyser node reports `getByteFrequencyData`.
pub struct FrequencyAnalyser {
    pub fft_size: usize,
    pub smoothing: f32,
    pub min_db: f32,
    pub max_db: f32,

    blackman: Vec<f32>,
    fft_buf: Vec<Complex32>,
    smoothed: Vec<f32>,

    fft: std::sync::Arc<dyn rustfft::Fft<f32>>,
}

impl FrequencyAnalyser {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);

        // periodic Blackman, a = 0.16
        let n_len = fft_size as f32;
        let blackman = (0..fft_size)
            .map(|n| {
                let x = 2.0 * PI * n as f32 / n_len;
                0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()
            })
            .collect::<Vec<_>>();

        Self {
            fft_size,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,

            blackman,
            fft_buf: vec![Complex32::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],

            fft,
        }
    }

    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Forgets the smoothing history.
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
    }

    /// Analyses `window` (shorter windows are zero-padded at the front) and
    /// writes one byte per bin into `out`.
    pub fn process(&mut self, window: &[f32], out: &mut [u8]) {
        let pad = self.fft_size.saturating_sub(window.len());
        let skip = window.len().saturating_sub(self.fft_size);
        for i in 0..self.fft_size {
            let x = if i < pad { 0.0 } else { window[skip + i - pad] };
            self.fft_buf[i] = Complex32::new(x * self.blackman[i], 0.0);
        }

        self.fft.process(&mut self.fft_buf);

        let norm = 1.0 / self.fft_size as f32;
        let tau = self.smoothing;
        for (k, prev) in self.smoothed.iter_mut().enumerate() {
            let mag = self.fft_buf[k].norm() * norm;
            let next = tau * *prev + (1.0 - tau) * mag;
            *prev = if next.is_finite() { next } else { 0.0 };
        }

        let scale = 255.0 / (self.max_db - self.min_db);
        for (byte, &mag) in out.iter_mut().zip(&self.smoothed) {
            *byte = if mag > 0.0 {
                let db = 20.0 * mag.log10();
                (scale * (db - self.min_db)).floor().clamp(0.0, 255.0) as u8
            } else {
                0
            };
        }
    }
}
