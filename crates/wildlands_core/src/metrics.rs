//! Simulation metrics collection.
//!
//! Provides structured logging and counters for monitoring battles, births
//! and casualties over a run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Metrics collector for simulation statistics.
pub struct Metrics {
    tick_count: AtomicU64,
    animal_count: AtomicU64,
    team_count: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            animal_count: AtomicU64::new(0),
            team_count: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, animals: usize, teams: usize) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.animal_count.store(animals as u64, Ordering::Relaxed);
        self.team_count.store(teams as u64, Ordering::Relaxed);

        // Log at info level every 1000 ticks
        let tick = self.tick_count.load(Ordering::Relaxed);
        if tick % 1000 == 0 {
            tracing::info!(
                tick = tick,
                animals = animals,
                teams = teams,
                battles = self.counter("battles"),
                births = self.counter("births"),
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    /// Adds `amount` to a named counter.
    pub fn add_to_counter(&self, name: &str, amount: u64) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(amount, Ordering::Relaxed);
    }

    pub fn increment_counter(&self, name: &str) {
        self.add_to_counter(name, 1);
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn animal_count(&self) -> u64 {
        self.animal_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging. Honors `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.tick_count(), 0);
        assert_eq!(metrics.counter("battles"), 0);
    }

    #[test]
    fn test_record_tick() {
        let metrics = Metrics::new();
        metrics.record_tick(Duration::from_millis(16), 40, 6);
        assert_eq!(metrics.tick_count(), 1);
        assert_eq!(metrics.animal_count(), 40);
    }

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.increment_counter("births");
        metrics.add_to_counter("births", 2);
        metrics.add_to_counter("casualties", 5);
        assert_eq!(metrics.counter("births"), 3);
        assert_eq!(metrics.counter("casualties"), 5);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging();
        init_logging();
    }
}
