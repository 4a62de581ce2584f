//! Similarity-weighted echo selection.

use crate::model::item::ContentItem;
use crate::seed::Prng;
use crate::similarity::score::{resonance_score, ResonanceWeights};
use serde::{Deserialize, Serialize};

/// Tunables for echo selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoOptions {
    /// Probability that the tag filter is skipped for a given current item.
    pub anomaly_rate: f64,
    pub weights: ResonanceWeights,
}

impl Default for EchoOptions {
    fn default() -> Self {
        Self {
            anomaly_rate: 0.12,
            weights: ResonanceWeights::default(),
        }
    }
}

/// Detailed echo outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoPick<'a> {
    pub item: &'a ContentItem,
    /// Whether the anomaly roll widened the pool to every other item.
    pub anomaly: bool,
    /// Winning resonance score; `None` when no candidate existed.
    pub score: Option<f64>,
}

/// Returns the item resonating most with `current`.
///
/// Returns `current` when the corpus holds no other item.
pub fn pick_echo<'a>(
    current: &'a ContentItem,
    corpus: &'a [ContentItem],
    options: &EchoOptions,
) -> &'a ContentItem {
    pick_echo_detailed(current, corpus, options).item
}

/// Same as [`pick_echo`], also reporting the anomaly roll and score.
pub fn pick_echo_detailed<'a>(
    current: &'a ContentItem,
    corpus: &'a [ContentItem],
    options: &EchoOptions,
) -> EchoPick<'a> {
    let anomaly = rolls_anomaly(current, options.anomaly_rate);
    let pool = corpus
        .iter()
        .filter(|item| item.id != current.id)
        .collect::<Vec<_>>();

    let related = if anomaly {
        Vec::new()
    } else {
        pool.iter()
            .copied()
            .filter(|item| item.shares_tag_with(current))
            .collect::<Vec<_>>()
    };
    let candidates = if related.is_empty() { pool } else { related };

    let mut best: Option<(&ContentItem, f64)> = None;
    for candidate in candidates {
        let score = resonance_score(current, candidate, &options.weights);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    match best {
        Some((item, score)) => EchoPick {
            item,
            anomaly,
            score: Some(score),
        },
        None => EchoPick {
            item: current,
            anomaly,
            score: None,
        },
    }
}

fn rolls_anomaly(current: &ContentItem, anomaly_rate: f64) -> bool {
    let roll = Prng::from_key(&format!("{}::echo::roll", current.id)).next_f64();
    roll < anomaly_rate
}
