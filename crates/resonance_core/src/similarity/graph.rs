//! Pruned similarity graph.
//!
//! # Responsibility
//! - Scan all unordered item pairs and keep those above a Jaccard threshold.
//! - Cap the output to the strongest `max_edges` edges.
//!
//! # Invariants
//! - Edge endpoints are stored with `a < b`; no self-edges, no duplicates.
//! - Output is sorted by descending strength; equal strengths keep scan order.
//! - Output length is at most `max_edges`.
//!
//! The scan is O(n²). Beyond a few thousand items, a tag-bucket pre-filter
//! should narrow candidate pairs before scoring.

use crate::model::corpus::Corpus;
use crate::similarity::score::{jaccard, shared_tags};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Threshold and cap applied when building a graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityOptions {
    /// Minimum Jaccard index an edge must reach.
    pub threshold: f64,
    /// Maximum number of edges kept after sorting.
    pub max_edges: usize,
}

impl Default for SimilarityOptions {
    fn default() -> Self {
        Self {
            threshold: 0.25,
            max_edges: 42,
        }
    }
}

/// Undirected weighted edge between two items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEdge {
    /// Lexicographically smaller endpoint id.
    pub a: String,
    /// Lexicographically larger endpoint id.
    pub b: String,
    /// Jaccard strength in `[0, 1]`.
    pub strength: f64,
    /// Tags both endpoints carry, sorted.
    pub shared_tags: Vec<String>,
}

impl SimilarityEdge {
    /// Whether `id` is one of the endpoints.
    pub fn touches(&self, id: &str) -> bool {
        self.a == id || self.b == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.a == id {
            Some(self.b.as_str())
        } else if self.b == id {
            Some(self.a.as_str())
        } else {
            None
        }
    }
}

/// Builds the pruned similarity graph for `corpus`.
///
/// Returns an empty list for corpora with fewer than two items.
pub fn build_similarity_graph(corpus: &Corpus, options: &SimilarityOptions) -> Vec<SimilarityEdge> {
    let started_at = Instant::now();
    let items = corpus.items();
    let mut edges = Vec::new();

    for (i, left) in items.iter().enumerate() {
        for right in &items[i + 1..] {
            let score = jaccard(left, right);
            if score <= 0.0 || score < options.threshold {
                continue;
            }
            let (a, b) = if left.id <= right.id {
                (left, right)
            } else {
                (right, left)
            };
            edges.push(SimilarityEdge {
                a: a.id.clone(),
                b: b.id.clone(),
                strength: score.min(1.0),
                shared_tags: shared_tags(a, b),
            });
        }
    }

    let qualifying = edges.len();
    // Stable sort keeps first-seen scan order for equal strengths.
    edges.sort_by(|x, y| y.strength.total_cmp(&x.strength));
    edges.truncate(options.max_edges);

    debug!(
        "event=similarity_graph module=similarity status=ok items={} qualifying={} kept={} duration_us={}",
        items.len(),
        qualifying,
        edges.len(),
        started_at.elapsed().as_micros()
    );
    edges
}

/// Edges touching `id`, in graph order.
pub fn neighbors<'a>(edges: &'a [SimilarityEdge], id: &str) -> Vec<&'a SimilarityEdge> {
    edges.iter().filter(|edge| edge.touches(id)).collect()
}
