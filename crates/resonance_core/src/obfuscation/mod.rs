//! Character masking for undiscovered previews.
//!
//! # Responsibility
//! - Mask alphanumeric characters of a text, revealing a seeded fraction.
//! - Build reader-facing previews that consult the discovery set.
//!
//! # Invariants
//! - Non-alphanumeric characters always pass through and consume no draw, so
//!   punctuation, whitespace and line shape are preserved.
//! - The same `(text, seed_key, reveal_ratio)` always yields the same output.
//! - Masking itself never reads or writes the discovery set.

use crate::discovery::set::{is_discovered, DiscoverySet};
use crate::model::item::ContentItem;
use crate::seed::Prng;
use serde::{Deserialize, Serialize};

/// Default mask glyph (full block).
pub const DEFAULT_MASK_GLYPH: char = '\u{2588}';

/// Tunables for masking and previews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObfuscationOptions {
    pub mask_glyph: char,
    /// Fraction of alphanumeric characters left readable in previews.
    pub reveal_ratio: f64,
}

impl Default for ObfuscationOptions {
    fn default() -> Self {
        Self {
            mask_glyph: DEFAULT_MASK_GLYPH,
            reveal_ratio: 0.18,
        }
    }
}

/// Masks alphanumeric characters of `text`.
///
/// `reveal_ratio` is clamped to `[0, 1]`; `NaN` reveals nothing.
pub fn obfuscate(text: &str, seed_key: &str, reveal_ratio: f64, mask_glyph: char) -> String {
    let ratio = if reveal_ratio.is_nan() {
        0.0
    } else {
        reveal_ratio.clamp(0.0, 1.0)
    };
    let mut rng = Prng::from_key(seed_key);

    text.chars()
        .map(|ch| {
            if !ch.is_alphanumeric() {
                return ch;
            }
            if rng.next_f64() < ratio {
                ch
            } else {
                mask_glyph
            }
        })
        .collect()
}

/// Reader-facing excerpt: plain when discovered, masked (keyed by id) otherwise.
pub fn preview_text(item: &ContentItem, set: &DiscoverySet, options: &ObfuscationOptions) -> String {
    if is_discovered(&item.id, set) {
        return item.excerpt.clone();
    }
    obfuscate(
        &item.excerpt,
        &item.id,
        options.reveal_ratio,
        options.mask_glyph,
    )
}
