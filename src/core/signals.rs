//! Synthetic need-signal generator.
//!
//! Every period one event is produced. With probability `need_probability` it
//! carries a need picked from the weighted table below, otherwise it is Calm.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::model::{Need, SignalEvent};
use super::ticker::PeriodicTask;

/// Detection weights for the needs a signal can carry. Sums to 1.
pub const NEED_WEIGHTS: [(Need, f64); 4] = [
    (Need::Food, 0.3),
    (Need::Water, 0.3),
    (Need::Restroom, 0.3),
    (Need::Emergency, 0.1),
];

pub const DEFAULT_NEED_PROBABILITY: f64 = 0.35;

/// Pick an item by comparing one uniform draw in [0, 1) against the running
/// cumulative weight. Overshoot (weights not reaching the draw) lands on the
/// last item.
///
/// Panics if `table` is empty.
pub fn pick_weighted<T: Copy>(draw: f64, table: &[(T, f64)]) -> T {
    let mut cumulative = 0.0;
    for (item, weight) in table {
        cumulative += weight;
        if draw <= cumulative {
            return *item;
        }
    }
    table[table.len() - 1].0
}

/// Decide the need for one event from two uniform draws.
pub fn classify(detect_draw: f64, pick_draw: f64, need_probability: f64) -> Need {
    if detect_draw < need_probability {
        pick_weighted(pick_draw, &NEED_WEIGHTS)
    } else {
        Need::Calm
    }
}

/// Produce one event from a random source.
pub fn sample_event<R: Rng + ?Sized>(rng: &mut R, need_probability: f64) -> SignalEvent {
    let detect_draw: f64 = rng.gen();
    let pick_draw: f64 = rng.gen();
    SignalEvent::for_need(classify(detect_draw, pick_draw, need_probability))
}

/// Periodic producer of [`SignalEvent`]s.
pub struct SignalGenerator {
    ticker: PeriodicTask,
    need_probability: f64,
    seed: Option<u64>,
}

impl SignalGenerator {
    pub fn new(period: Duration, need_probability: f64, seed: Option<u64>) -> Self {
        Self {
            ticker: PeriodicTask::new("signal generator", period),
            need_probability,
            seed,
        }
    }

    /// Start producing events into `callback`. Must run inside a tokio runtime.
    pub fn start<F>(&mut self, mut callback: F)
    where
        F: FnMut(SignalEvent) + Send + 'static,
    {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let need_probability = self.need_probability;
        self.ticker.start(move || {
            let event = sample_event(&mut rng, need_probability);
            callback(event);
        });
    }

    /// Stop producing. Idempotent; no callback runs after this returns.
    pub fn stop(&mut self) {
        self.ticker.stop();
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = NEED_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pick_weighted_cumulative_boundaries() {
        assert_eq!(pick_weighted(0.0, &NEED_WEIGHTS), Need::Food);
        assert_eq!(pick_weighted(0.3, &NEED_WEIGHTS), Need::Food);
        assert_eq!(pick_weighted(0.31, &NEED_WEIGHTS), Need::Water);
        assert_eq!(pick_weighted(0.75, &NEED_WEIGHTS), Need::Restroom);
        assert_eq!(pick_weighted(0.95, &NEED_WEIGHTS), Need::Emergency);
    }

    #[test]
    fn test_pick_weighted_overshoot_defaults_to_last() {
        let short = [(Need::Food, 0.2), (Need::Water, 0.2)];
        assert_eq!(pick_weighted(0.9, &short), Need::Water);
        assert_eq!(pick_weighted(1.5, &NEED_WEIGHTS), Need::Emergency);
    }

    #[test]
    fn test_classify_respects_need_probability() {
        assert_eq!(classify(0.5, 0.0, DEFAULT_NEED_PROBABILITY), Need::Calm);
        assert_eq!(classify(0.35, 0.0, DEFAULT_NEED_PROBABILITY), Need::Calm);
        assert_eq!(classify(0.1, 0.0, DEFAULT_NEED_PROBABILITY), Need::Food);
        assert_eq!(classify(0.1, 0.99, DEFAULT_NEED_PROBABILITY), Need::Emergency);
    }

    #[test]
    fn test_sampled_distribution_is_roughly_weighted() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut calm = 0;
        let mut emergency = 0;
        for _ in 0..10_000 {
            match sample_event(&mut rng, DEFAULT_NEED_PROBABILITY).need {
                Need::Calm => calm += 1,
                Need::Emergency => emergency += 1,
                _ => {}
            }
        }
        // 65% calm, 3.5% emergency
        assert!((6_000..7_000).contains(&calm), "calm = {}", calm);
        assert!((200..500).contains(&emergency), "emergency = {}", emergency);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generator_emits_every_period_until_stopped() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut generator = SignalGenerator::new(Duration::from_secs(5), 1.0, Some(1));
        generator.start(move |event| sink.lock().unwrap().push(event));

        tokio::time::sleep(Duration::from_secs(16)).await;
        generator.stop();
        generator.stop();
        assert!(!generator.is_running());

        let events = seen.lock().unwrap().clone();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| !e.is_calm()), "probability 1.0 never yields Calm");

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(seen.lock().unwrap().len(), 3);
    }
}
