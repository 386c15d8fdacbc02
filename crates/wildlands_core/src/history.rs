use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Samples kept per trait in the species trait history.
pub const TRAIT_HISTORY_CAP: usize = 100;
/// Samples kept in hunt outcome and social performance histories.
pub const SHORT_HISTORY_CAP: usize = 10;
/// Entries kept in a species' combat history.
pub const COMBAT_HISTORY_CAP: usize = 20;

/// Append-and-trim history: pushing past `cap` drops the oldest sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingWindow<T> {
    cap: usize,
    samples: VecDeque<T>,
}

impl<T> RollingWindow<T> {
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            samples: VecDeque::with_capacity(cap.max(1)),
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.samples.len() == self.cap {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.samples.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }
}

impl RollingWindow<f64> {
    /// Mean of the window, `None` when empty.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }
}

impl RollingWindow<bool> {
    /// Fraction of `true` samples, `None` when empty.
    #[must_use]
    pub fn rate(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let hits = self.samples.iter().filter(|s| **s).count();
        Some(hits as f64 / self.samples.len() as f64)
    }
}
