//! Deterministic 2D placement of corpus items.
//!
//! # Responsibility
//! - Place every item on a normalized `[0, 1]` plane for map-style views.
//! - Derive per-item visual attributes (size, brightness, pulse phase).
//!
//! # Invariants
//! - Output is a pure function of corpus membership, strategy and options;
//!   supply order never matters.
//! - Coordinates always stay inside `[margin, 1 - margin]`.
//! - Visual attributes come from a per-item stream seeded by the item id, so
//!   adding or removing other items only moves positions.

mod strategy;

pub use strategy::{GoldenSpiral, LayoutPreset, LayoutStrategy, Radial, UnknownLayoutPreset};

use crate::model::corpus::Corpus;
use crate::model::item::ContentItem;
use crate::seed::{hash, Prng};
use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::time::Instant;

const BRIGHTNESS_MIN: f64 = 0.35;
const BRIGHTNESS_MAX: f64 = 1.0;

/// Tunables for `compute_layout`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Built-in angle strategy used by `compute_layout`.
    pub preset: LayoutPreset,
    /// Safe margin; coordinates are clamped into `[margin, 1 - margin]`.
    pub margin: f64,
    /// Radius of the first item.
    pub base_radius: f64,
    /// Growth factor applied to `sqrt(index)`.
    ///
    /// Upper bound: large corpora shrink it so the outermost item still fits
    /// inside the margin instead of piling up on the border.
    pub radius_scale: f64,
    /// Total width of the random radius perturbation.
    pub jitter: f64,
    pub size_min: f64,
    pub size_max: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            preset: LayoutPreset::GoldenSpiral,
            margin: 0.08,
            base_radius: 0.04,
            radius_scale: 0.03,
            jitter: 0.04,
            size_min: 1.0,
            size_max: 3.5,
        }
    }
}

/// Placement and visual attributes for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub item_id: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Relative brightness in `[0.35, 1.0)`.
    pub brightness: f64,
    /// Animation phase offset in radians, `[0, 2π)`.
    pub pulse_phase: f64,
}

/// Lays out `corpus` with the strategy selected by `options.preset`.
pub fn compute_layout(corpus: &Corpus, options: &LayoutOptions) -> Vec<LayoutNode> {
    compute_layout_with(corpus, options.preset.strategy(), options)
}

/// Lays out `corpus` with a caller-supplied angle strategy.
///
/// Nodes are returned in placement order: ascending publish date (undated
/// items first), ties broken by id.
pub fn compute_layout_with(
    corpus: &Corpus,
    strategy: &dyn LayoutStrategy,
    options: &LayoutOptions,
) -> Vec<LayoutNode> {
    if corpus.is_empty() {
        return Vec::new();
    }

    let started_at = Instant::now();
    let mut rng = Prng::new(hash(&corpus.sorted_ids().join(",")));
    let ordered = placement_order(corpus);
    let count = ordered.len();
    let (lo, hi) = safe_range(options.margin);
    let radius_scale = effective_radius_scale(options, count, lo);

    let nodes = ordered
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let angle = strategy.angle(index, count);
            let spread = (rng.next_f64() - 0.5) * options.jitter;
            let radius = options.base_radius + (index as f64).sqrt() * radius_scale + spread;
            let mut attributes = Prng::new(hash(&item.id));
            LayoutNode {
                item_id: item.id.clone(),
                x: clamp_coordinate(0.5 + angle.cos() * radius, lo, hi),
                y: clamp_coordinate(0.5 + angle.sin() * radius, lo, hi),
                size: attributes.range(options.size_min, options.size_max),
                brightness: attributes.range(BRIGHTNESS_MIN, BRIGHTNESS_MAX),
                pulse_phase: attributes.range(0.0, TAU),
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "event=layout_compute module=layout status=ok items={} duration_us={}",
        nodes.len(),
        started_at.elapsed().as_micros()
    );
    nodes
}

fn placement_order(corpus: &Corpus) -> Vec<&ContentItem> {
    let mut ordered = corpus.items().iter().collect::<Vec<_>>();
    ordered.sort_by(|a, b| {
        a.published_at
            .cmp(&b.published_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    ordered
}

fn safe_range(margin: f64) -> (f64, f64) {
    let margin = if margin.is_finite() {
        margin.clamp(0.0, 0.5)
    } else {
        0.0
    };
    (margin, 1.0 - margin)
}

fn effective_radius_scale(options: &LayoutOptions, count: usize, lo: f64) -> f64 {
    let room = (0.5 - lo) - options.base_radius - options.jitter.abs() / 2.0;
    if count <= 1 || room <= 0.0 {
        return options.radius_scale;
    }
    options
        .radius_scale
        .min(room / ((count - 1) as f64).sqrt())
}

fn clamp_coordinate(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return 0.5;
    }
    value.clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::{
        clamp_coordinate, compute_layout, effective_radius_scale, safe_range, LayoutOptions,
    };
    use crate::model::corpus::Corpus;
    use crate::model::item::ContentItem;

    #[test]
    fn placement_follows_publish_date_then_id() {
        let corpus = Corpus::new(vec![
            ContentItem::new("late", "L").unwrap().with_published_at(300),
            ContentItem::new("b-early", "B").unwrap().with_published_at(100),
            ContentItem::new("a-early", "A").unwrap().with_published_at(100),
            ContentItem::new("undated", "U").unwrap(),
        ]);
        let ids = compute_layout(&corpus, &LayoutOptions::default())
            .into_iter()
            .map(|node| node.item_id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["undated", "a-early", "b-early", "late"]);
    }

    #[test]
    fn safe_range_rejects_out_of_bounds_margins() {
        assert_eq!(safe_range(0.9), (0.5, 0.5));
        assert_eq!(safe_range(f64::NAN), (0.0, 1.0));
    }

    #[test]
    fn radius_scale_shrinks_only_for_large_corpora() {
        let options = LayoutOptions::default();
        let (lo, _) = safe_range(options.margin);
        assert_eq!(effective_radius_scale(&options, 20, lo), options.radius_scale);
        assert_eq!(effective_radius_scale(&options, 1, lo), options.radius_scale);
        let large = effective_radius_scale(&options, 401, lo);
        assert!((large - 0.36 / 20.0).abs() < 1e-9);
    }

    #[test]
    fn clamp_coordinate_centers_nan() {
        assert_eq!(clamp_coordinate(f64::NAN, 0.1, 0.9), 0.5);
        assert_eq!(clamp_coordinate(2.0, 0.1, 0.9), 0.9);
    }
}
