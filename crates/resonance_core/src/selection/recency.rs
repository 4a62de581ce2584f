//! Recency-weighted roulette selection for the "tune" action.
//!
//! Unlike echo selection this path is intentionally non-deterministic: each
//! call draws from the thread-local generator.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tunables for recency-weighted selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecencyOptions {
    /// Extra weight per rank step; the most recent id gets `1 + n * coefficient`.
    pub coefficient: f64,
}

impl Default for RecencyOptions {
    fn default() -> Self {
        Self { coefficient: 0.06 }
    }
}

/// Weights for `n` ids ordered most-recent-first.
///
/// `weight[i] = 1 + max(0, n - i) * coefficient`; every weight is at least 1.
pub fn recency_weights(n: usize, coefficient: f64) -> Vec<f64> {
    let coefficient = if coefficient.is_finite() {
        coefficient.max(0.0)
    } else {
        0.0
    };
    (0..n)
        .map(|i| 1.0 + n.saturating_sub(i) as f64 * coefficient)
        .collect()
}

/// Picks one id with recency-biased probability.
///
/// Returns an empty string for empty input.
pub fn pick_weighted_recent(ids_by_recency: &[String], options: &RecencyOptions) -> String {
    if ids_by_recency.len() <= 1 {
        return ids_by_recency.first().cloned().unwrap_or_default();
    }
    let draw = rand::thread_rng().gen::<f64>();
    pick_weighted_recent_with(ids_by_recency, options.coefficient, draw)
}

/// Roulette selection with an explicit unit draw in `[0, 1)`.
///
/// Out-of-range draws are clamped, so the call stays total.
pub fn pick_weighted_recent_with(ids_by_recency: &[String], coefficient: f64, draw: f64) -> String {
    match ids_by_recency {
        [] => return String::new(),
        [only] => return only.clone(),
        _ => {}
    }

    let weights = recency_weights(ids_by_recency.len(), coefficient);
    let total = weights.iter().sum::<f64>();
    let unit = if draw.is_finite() {
        draw.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let target = unit * total;

    let mut cumulative = 0.0;
    for (id, weight) in ids_by_recency.iter().zip(&weights) {
        cumulative += weight;
        if cumulative > target {
            return id.clone();
        }
    }
    // Only reachable when `draw` is exactly 1.0 or float rounding lands on the total.
    ids_by_recency
        .last()
        .cloned()
        .unwrap_or_default()
}
