//! Per-viewer discovery record.
//!
//! # Responsibility
//! - Track which items a viewer has opened (`DiscoverySet`).
//! - Define the repository contract the persistence layer implements, with a
//!   single change-notification channel.
//!
//! # Invariants
//! - Discovery is one-way: Undiscovered -> Discovered; ids are never removed.
//! - Concurrent writers converge because every write is a set union.
//! - Corrupt persisted payloads degrade to an empty set.

pub mod repository;
pub mod set;

pub use repository::{
    DiscoveryChange, DiscoveryListener, DiscoveryRepository, InMemoryDiscoveryRepository,
    SubscriptionId,
};
pub use set::{is_discovered, mark_discovered, DiscoverySet};
