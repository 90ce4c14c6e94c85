//! Frequency analyser with the byte-spectrum semantics browsers expose:
//! Blackman window, magnitude normalised by the FFT size, exponential
//! smoothing over time, then a linear map of a decibel range onto `0..=255`.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use thiserror::Error;

pub const DEFAULT_FFT_SIZE: usize = 2048;
pub const DEFAULT_SMOOTHING: f32 = 0.8;
pub const DEFAULT_MIN_DECIBELS: f32 = -100.0;
pub const DEFAULT_MAX_DECIBELS: f32 = -30.0;
pub const FFT_SIZE_RANGE: (usize, usize) = (32, 32768);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyserError {
    #[error("fft size {0} must be a power of two in 32..=32768")]
    InvalidFftSize(usize),
    #[error("decibel range [{min}, {max}] is empty")]
    InvalidDecibelRange { min: f32, max: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyserSettings {
    pub fft_size: usize,
    /// Weight of the previous frame's magnitude, `0.0..=1.0`.
    pub smoothing_time_constant: f32,
    pub min_decibels: f32,
    pub max_decibels: f32,
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            smoothing_time_constant: DEFAULT_SMOOTHING,
            min_decibels: DEFAULT_MIN_DECIBELS,
            max_decibels: DEFAULT_MAX_DECIBELS,
        }
    }
}

impl AnalyserSettings {
    pub fn validate(&self) -> Result<(), AnalyserError> {
        let (lo, hi) = FFT_SIZE_RANGE;
        if !self.fft_size.is_power_of_two() || self.fft_size < lo || self.fft_size > hi {
            return Err(AnalyserError::InvalidFftSize(self.fft_size));
        }
        if !(self.min_decibels < self.max_decibels) {
            return Err(AnalyserError::InvalidDecibelRange {
                min: self.min_decibels,
                max: self.max_decibels,
            });
        }
        Ok(())
    }
}

pub struct FrequencyAnalyser {
    settings: AnalyserSettings,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    // Most recent `fft_size` samples, oldest at `write_pos`.
    history: Vec<f32>,
    write_pos: usize,
    fft_buf: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl FrequencyAnalyser {
    pub fn new(settings: AnalyserSettings) -> Result<Self, AnalyserError> {
        settings.validate()?;
        let n = settings.fft_size;
        let settings = AnalyserSettings {
            smoothing_time_constant: settings.smoothing_time_constant.clamp(0.0, 1.0),
            ..settings
        };
        let fft = FftPlanner::<f32>::new().plan_fft_forward(n);
        Ok(Self {
            settings,
            fft,
            window: blackman(n),
            history: vec![0.0; n],
            write_pos: 0,
            fft_buf: vec![Complex { re: 0.0, im: 0.0 }; n],
            smoothed: vec![0.0; n / 2],
        })
    }

    pub fn settings(&self) -> &AnalyserSettings {
        &self.settings
    }

    pub fn fft_size(&self) -> usize {
        self.settings.fft_size
    }

    /// Length of every frame produced: half the FFT size.
    pub fn bin_count(&self) -> usize {
        self.settings.fft_size / 2
    }

    /// Appends mono samples in `-1.0..=1.0`.
    pub fn push_samples(&mut self, samples: &[f32]) {
        let n = self.history.len();
        for &s in samples {
            self.history[self.write_pos] = s;
            self.write_pos = (self.write_pos + 1) % n;
        }
    }

    /// Runs one analysis over the current window and updates the smoothed
    /// magnitudes.
    pub fn analyse(&mut self) {
        let n = self.history.len();
        for i in 0..n {
            let s = self.history[(self.write_pos + i) % n];
            self.fft_buf[i] = Complex {
                re: s * self.window[i],
                im: 0.0,
            };
        }
        self.fft.process(&mut self.fft_buf);

        let tau = self.settings.smoothing_time_constant;
        let scale = 1.0 / n as f32;
        for (smoothed, c) in self.smoothed.iter_mut().zip(&self.fft_buf) {
            let mag = c.norm() * scale;
            let next = tau * *smoothed + (1.0 - tau) * mag;
            *smoothed = if next.is_finite() { next } else { 0.0 };
        }
    }

    /// Smoothed magnitudes of the last [`analyse`](Self::analyse) call.
    pub fn magnitudes(&self) -> &[f32] {
        &self.smoothed
    }

    /// Analyses the current window and writes one byte per bin into `out`.
    pub fn byte_frequency_data(&mut self, out: &mut Vec<u8>) {
        self.analyse();
        out.clear();
        out.extend(self.smoothed.iter().map(|&m| {
            magnitude_to_byte(m, self.settings.min_decibels, self.settings.max_decibels)
        }));
    }
}

/// Maps a linear magnitude onto the byte scale of `[min_db, max_db]`.
pub fn magnitude_to_byte(magnitude: f32, min_db: f32, max_db: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let scaled = (255.0 / (max_db - min_db)) * (db - min_db);
    scaled.floor().clamp(0.0, 255.0) as u8
}

fn blackman(n: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            A0 - A1 * (2.0 * PI * x).cos() + A2 * (4.0 * PI * x).cos()
        })
        .collect()
}
