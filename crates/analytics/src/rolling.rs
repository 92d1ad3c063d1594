use crate::stats::mean;
use std::collections::VecDeque;

/// A fixed-capacity sliding window that maintains the mean and the sum of
/// squared deviations incrementally (Welford's update, extended with removal).
///
/// Statistics are only reported once the window is full, matching a trailing
/// window that requires exactly `capacity` observations.
///
/// Rounding error from the incremental update is discarded every `capacity`
/// pushes by rebuilding both moments from the stored values, and a window
/// holding one repeated value reports that value and a zero deviation exactly.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
    mean: f64,
    m2: f64,
    /// Pushes since the moments were last rebuilt.
    since_rebuild: usize,
    /// Length of the trailing run of identical values.
    run: usize,
}

impl RollingWindow {
    /// Creates an empty window. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
            mean: 0.0,
            m2: 0.0,
            since_rebuild: 0,
            run: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Adds a value, evicting the oldest one once the window is full.
    pub fn push(&mut self, value: f64) {
        self.run = match self.values.back() {
            Some(last) if *last == value => self.run + 1,
            _ => 1,
        };

        if self.is_full() {
            if let Some(evicted) = self.values.pop_front() {
                let n = self.capacity as f64;
                let old_mean = self.mean;
                self.mean += (value - evicted) / n;
                self.m2 += (value - evicted) * (value - self.mean + evicted - old_mean);
            }
        } else {
            let n = (self.values.len() + 1) as f64;
            let delta = value - self.mean;
            self.mean += delta / n;
            self.m2 += delta * (value - self.mean);
        }

        // Cancellation can push a zero-variance window fractionally below zero.
        if self.m2 < 0.0 {
            self.m2 = 0.0;
        }
        self.values.push_back(value);

        self.since_rebuild += 1;
        if self.since_rebuild >= self.capacity {
            self.rebuild();
        }
    }

    /// Recomputes the moments from scratch with the two-pass formula.
    fn rebuild(&mut self) {
        let values = self.values.make_contiguous();
        if let Some(m) = mean(values) {
            self.mean = m;
            self.m2 = values.iter().map(|v| (v - m) * (v - m)).sum();
        }
        self.since_rebuild = 0;
    }

    /// The window holds a single repeated value.
    fn is_constant(&self) -> bool {
        self.run >= self.capacity
    }

    /// Mean of the window, or `None` until it holds `capacity` values.
    pub fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        if self.is_constant() {
            return self.values.back().copied();
        }
        Some(self.mean)
    }

    /// Sample (n - 1) standard deviation, or `None` until the window is full.
    /// A window of capacity one has no sample deviation.
    pub fn std_dev(&self) -> Option<f64> {
        if !self.is_full() || self.capacity < 2 {
            return None;
        }
        if self.is_constant() {
            return Some(0.0);
        }
        Some((self.m2 / (self.capacity - 1) as f64).sqrt())
    }
}
