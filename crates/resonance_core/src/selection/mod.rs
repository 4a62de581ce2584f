//! Related-item ("echo") and recency-weighted ("tune") selection.
//!
//! # Responsibility
//! - Pick the most resonant item for a reader currently on one item.
//! - Pick a recency-biased random item for the interactive "tune" action.
//!
//! # Invariants
//! - Echo selection is deterministic for a given current item and corpus.
//! - Recency selection never assigns zero weight to any id.
//! - Both selectors are total: empty input yields a no-op result.

pub mod echo;
pub mod recency;
