//! Union-only discovery set and its persisted payload form.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ids of items the viewer has opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoverySet {
    ids: BTreeSet<String>,
}

impl DiscoverySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is recorded; ids are compared trimmed, as on insert.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id.trim())
    }

    /// Adds `id`; returns `true` when it was not yet discovered.
    ///
    /// Blank ids are ignored.
    pub fn insert(&mut self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() {
            return false;
        }
        self.ids.insert(id.to_string())
    }

    /// Unions `other` into `self`; returns the number of newly added ids.
    pub fn merge(&mut self, other: &DiscoverySet) -> usize {
        let before = self.ids.len();
        self.ids.extend(other.ids.iter().cloned());
        self.ids.len() - before
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Discovered ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Decodes a persisted JSON array of ids.
    ///
    /// Any unreadable payload degrades to an empty set; non-string and blank
    /// entries are dropped.
    pub fn from_payload(payload: &str) -> Self {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return Self::new();
        }
        match serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
            Ok(values) => {
                let mut set = Self::new();
                for value in values {
                    if let serde_json::Value::String(id) = value {
                        set.insert(&id);
                    }
                }
                set
            }
            Err(err) => {
                warn!(
                    "event=discovery_decode module=discovery status=degraded payload_len={} error={}",
                    payload.len(),
                    err
                );
                Self::new()
            }
        }
    }

    /// Encodes the set as a sorted JSON array of ids.
    pub fn to_payload(&self) -> String {
        serde_json::to_string(&self.ids).unwrap_or_else(|_| "[]".to_string())
    }
}

impl<S: AsRef<str>> FromIterator<S> for DiscoverySet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id.as_ref());
        }
        set
    }
}

/// Whether `id` has been opened by the viewer.
pub fn is_discovered(id: &str, set: &DiscoverySet) -> bool {
    set.contains(id)
}

/// Returns `set` with `id` added; never removes anything.
pub fn mark_discovered(id: &str, set: &DiscoverySet) -> DiscoverySet {
    let mut next = set.clone();
    next.insert(id);
    next
}
