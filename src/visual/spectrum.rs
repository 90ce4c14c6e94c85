/// Weight kept from the previous frame.
pub const SMOOTHING: f32 = 0.7;

/// Per-bar exponential moving average behind the spectrum view.
#[derive(Debug, Clone, Default)]
pub struct SpectrumSmoother {
    history: Vec<f32>,
}

impl SpectrumSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[f32] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Reallocates to `bins` zeros when the bar count changed.
    pub fn ensure_len(&mut self, bins: usize) {
        if self.history.len() != bins {
            log::debug!("spectrum history resized {} -> {bins}", self.history.len());
            self.history = vec![0.0; bins];
        }
    }

    /// Folds one frame of samples into the history and returns it.
    pub fn update(&mut self, samples: &[u8]) -> &[f32] {
        self.ensure_len(samples.len());
        for (smoothed, &s) in self.history.iter_mut().zip(samples) {
            *smoothed = *smoothed * SMOOTHING + f32::from(s) * (1.0 - SMOOTHING);
        }
        &self.history
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}
