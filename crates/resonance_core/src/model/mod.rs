//! Content model consumed by the resonance engine.
//!
//! # Responsibility
//! - Define the item and corpus shapes every engine component reads.
//! - Normalize tags once at the boundary so scoring never re-normalizes.
//!
//! # Invariants
//! - Every item is identified by a stable, non-empty string id.
//! - A corpus never contains two items with the same id.
//! - Items are immutable from the engine's point of view.

pub mod corpus;
pub mod item;
