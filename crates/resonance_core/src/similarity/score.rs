//! Pairwise similarity scores.

use crate::model::item::ContentItem;
use crate::seed::Prng;
use serde::{Deserialize, Serialize};

/// Weights for the composite resonance score used by echo selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResonanceWeights {
    pub overlap: f64,
    pub jaccard: f64,
    pub jitter: f64,
}

impl Default for ResonanceWeights {
    fn default() -> Self {
        Self {
            overlap: 0.35,
            jaccard: 1.6,
            jitter: 0.15,
        }
    }
}

/// Number of tags shared by `a` and `b`.
pub fn overlap_count(a: &ContentItem, b: &ContentItem) -> usize {
    a.tags.intersection(&b.tags).count()
}

/// Jaccard index of the two tag sets; `0.0` when both are empty.
pub fn jaccard(a: &ContentItem, b: &ContentItem) -> f64 {
    let shared = overlap_count(a, b);
    let union = a.tags.len() + b.tags.len() - shared;
    if union == 0 {
        return 0.0;
    }
    shared as f64 / union as f64
}

/// Deterministic tie-breaker in `[0, 1)` keyed by `a.id + "::" + b.id`.
pub fn jitter(a: &ContentItem, b: &ContentItem) -> f64 {
    Prng::from_key(&format!("{}::{}", a.id, b.id)).next_f64()
}

/// Composite resonance of `candidate` relative to `current`.
pub fn resonance_score(
    current: &ContentItem,
    candidate: &ContentItem,
    weights: &ResonanceWeights,
) -> f64 {
    overlap_count(current, candidate) as f64 * weights.overlap
        + jaccard(current, candidate) * weights.jaccard
        + jitter(current, candidate) * weights.jitter
}

/// Tags present on both items, sorted.
pub fn shared_tags(a: &ContentItem, b: &ContentItem) -> Vec<String> {
    a.tags.intersection(&b.tags).cloned().collect()
}
