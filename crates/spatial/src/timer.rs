use std::time::Duration;

/// Rolling window of update durations, in milliseconds.
#[derive(Debug, Clone)]
pub struct UpdateTimer {
    samples: Vec<f32>,
    next: usize,
    filled: bool,
}

impl UpdateTimer {
    /// Timer keeping the last `window` samples (at least one).
    pub fn new(window: usize) -> Self {
        Self {
            samples: vec![0.0; window.max(1)],
            next: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.record_ms(elapsed.as_secs_f32() * 1000.0);
    }

    pub fn record_ms(&mut self, ms: f32) {
        self.samples[self.next] = ms;
        self.next = (self.next + 1) % self.samples.len();
        if self.next == 0 {
            self.filled = true;
        }
    }

    /// Samples currently held.
    pub fn count(&self) -> usize {
        if self.filled { self.samples.len() } else { self.next }
    }

    pub fn window(&self) -> usize {
        self.samples.len()
    }

    fn held(&self) -> &[f32] {
        &self.samples[..self.count()]
    }

    /// Most recent sample, 0 before the first record.
    pub fn last_ms(&self) -> f32 {
        if self.count() == 0 {
            return 0.0;
        }
        let last = (self.next + self.samples.len() - 1) % self.samples.len();
        self.samples[last]
    }

    pub fn average_ms(&self) -> f32 {
        let held = self.held();
        if held.is_empty() {
            return 0.0;
        }
        held.iter().sum::<f32>() / held.len() as f32
    }

    pub fn peak_ms(&self) -> f32 {
        self.held().iter().copied().fold(0.0, f32::max)
    }

    pub fn reset(&mut self) {
        self.samples.fill(0.0);
        self.next = 0;
        self.filled = false;
    }
}
