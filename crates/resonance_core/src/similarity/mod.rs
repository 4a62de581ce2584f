//! Tag-overlap similarity scoring and graph construction.
//!
//! # Responsibility
//! - Score item pairs by shared tags (overlap, Jaccard, composite resonance).
//! - Build the pruned similarity graph shared by the atlas and archive views.
//!
//! # Invariants
//! - Every score is symmetric except the tie-breaking jitter, which is keyed by
//!   the ordered id pair and fully deterministic.
//! - Graphs hold no self-edges and no duplicate unordered pairs.

pub mod graph;
pub mod score;
