//! Corpus model: the deduplicated item set one computation runs over.
//!
//! # Responsibility
//! - Deduplicate supplied items by id (first occurrence wins).
//! - Derive an order-independent identity fingerprint and an exact map key.
//! - Decode corpora from JSON payloads supplied by the content source.
//!
//! # Invariants
//! - Item order is preserved as supplied, minus duplicates.
//! - `fingerprint` depends on ids, tags and publish dates, never on order.
//! - `CorpusKey` equality implies equal layout and graph output.

use crate::model::item::{ContentItem, RawContentItem};
use crate::seed::hash;
use log::{info, warn};
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Corpus loading errors.
#[derive(Debug)]
pub enum CorpusError {
    /// Corpus file cannot be read.
    Io(std::io::Error),
    /// Payload is not a JSON array of item objects.
    Parse(serde_json::Error),
}

impl Display for CorpusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read corpus: {err}"),
            Self::Parse(err) => write!(f, "invalid corpus payload: {err}"),
        }
    }
}

impl Error for CorpusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CorpusError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CorpusError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Exact identity of the inputs derived maps read: per-item id, tags and
/// publish date, in supply order (graph ties keep scan order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusKey {
    entries: Vec<(String, BTreeSet<String>, Option<i64>)>,
}

impl CorpusKey {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered, id-deduplicated collection of content items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    items: Vec<ContentItem>,
}

impl Corpus {
    /// Builds a corpus, dropping later items whose id was already seen.
    pub fn new(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        Self { items }
    }

    /// Decodes a JSON array of items.
    ///
    /// Items failing validation (blank id) are skipped with a warning instead
    /// of rejecting the whole payload.
    ///
    /// # Errors
    /// - Returns `CorpusError::Parse` when the payload is not an array of objects.
    pub fn from_json_str(payload: &str) -> Result<Self, CorpusError> {
        let raw_items: Vec<RawContentItem> = serde_json::from_str(payload)?;
        let total = raw_items.len();
        let mut items = Vec::with_capacity(total);
        for (index, raw) in raw_items.into_iter().enumerate() {
            match ContentItem::try_from(raw) {
                Ok(item) => items.push(item),
                Err(err) => warn!(
                    "event=corpus_decode module=model status=degraded index={} error={}",
                    index, err
                ),
            }
        }

        let corpus = Self::new(items);
        info!(
            "event=corpus_decode module=model status=ok supplied={} kept={}",
            total,
            corpus.len()
        );
        Ok(corpus)
    }

    /// Reads and decodes a JSON corpus file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let payload = std::fs::read_to_string(path)?;
        Self::from_json_str(&payload)
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Item ids sorted ascending.
    pub fn sorted_ids(&self) -> Vec<&str> {
        let mut ids = self
            .items
            .iter()
            .map(|item| item.id.as_str())
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    /// Order-independent identity hash over ids, tags and publish dates.
    ///
    /// Fields are length-prefixed so separators inside ids or tags cannot
    /// alias. A 32-bit digest for logs and display; compare [`CorpusKey`]
    /// values for exact equality.
    pub fn fingerprint(&self) -> u32 {
        let mut ordered = self.items.iter().collect::<Vec<_>>();
        ordered.sort_unstable_by(|a, b| a.id.cmp(&b.id));

        let mut encoded = String::new();
        for item in ordered {
            push_field(&mut encoded, &item.id);
            encoded.push_str(&format!("{}:", item.tags.len()));
            for tag in &item.tags {
                push_field(&mut encoded, tag);
            }
            match item.published_at {
                Some(epoch_ms) => encoded.push_str(&format!("d{epoch_ms};")),
                None => encoded.push_str("n;"),
            }
        }
        hash(&encoded)
    }

    /// Exact key for memoizing derived maps.
    pub fn key(&self) -> CorpusKey {
        CorpusKey {
            entries: self
                .items
                .iter()
                .map(|item| (item.id.clone(), item.tags.clone(), item.published_at))
                .collect(),
        }
    }
}

fn push_field(encoded: &mut String, value: &str) {
    encoded.push_str(&format!("{}:{}", value.len(), value));
}

impl From<Vec<ContentItem>> for Corpus {
    fn from(value: Vec<ContentItem>) -> Self {
        Self::new(value)
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a ContentItem;
    type IntoIter = std::slice::Iter<'a, ContentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Corpus;
    use crate::model::item::ContentItem;

    fn item(id: &str, tags: &[&str]) -> ContentItem {
        ContentItem::new(id, id).unwrap().with_tags(tags.iter().copied())
    }

    #[test]
    fn new_keeps_first_occurrence_of_duplicate_ids() {
        let corpus = Corpus::new(vec![
            item("a", &["x"]),
            item("b", &[]),
            item("a", &["y"]),
        ]);
        assert_eq!(corpus.len(), 2);
        assert!(corpus.get("a").unwrap().tags.contains("x"));
    }

    #[test]
    fn fingerprint_ignores_order_but_tracks_tags() {
        let forward = Corpus::new(vec![item("a", &["x"]), item("b", &["y"])]);
        let reversed = Corpus::new(vec![item("b", &["y"]), item("a", &["x"])]);
        let retagged = Corpus::new(vec![item("a", &["x"]), item("b", &["z"])]);
        assert_eq!(forward.fingerprint(), reversed.fingerprint());
        assert_ne!(forward.fingerprint(), retagged.fingerprint());
    }

    #[test]
    fn fingerprint_does_not_alias_separators_in_tags() {
        let split = Corpus::new(vec![item("a", &["x", "y"]), item("b", &["x"])]);
        let joined = Corpus::new(vec![item("a", &["x,y"]), item("b", &["x"])]);
        assert_ne!(split.fingerprint(), joined.fingerprint());
        assert_ne!(split.key(), joined.key());
    }

    #[test]
    fn fingerprint_and_key_track_publish_dates() {
        let first = Corpus::new(vec![
            item("a", &[]).with_published_at(1),
            item("b", &[]).with_published_at(2),
        ]);
        let swapped = Corpus::new(vec![
            item("a", &[]).with_published_at(2),
            item("b", &[]).with_published_at(1),
        ]);
        assert_ne!(first.fingerprint(), swapped.fingerprint());
        assert_ne!(first.key(), swapped.key());
    }

    #[test]
    fn key_follows_supply_order() {
        let forward = Corpus::new(vec![item("a", &["x"]), item("b", &["x"])]);
        let reversed = Corpus::new(vec![item("b", &["x"]), item("a", &["x"])]);
        assert_eq!(forward.key(), forward.clone().key());
        assert_ne!(forward.key(), reversed.key());
        assert_eq!(forward.key().len(), 2);
    }

    #[test]
    fn from_json_str_skips_blank_ids_and_malformed_tags() {
        let payload = r#"[
            {"id": "a", "title": "A", "tags": ["X", 3, null]},
            {"id": "  ", "title": "blank"},
            {"id": "b", "title": "B", "tags": "not-a-list"}
        ]"#;
        let corpus = Corpus::from_json_str(payload).unwrap();
        assert_eq!(corpus.sorted_ids(), vec!["a", "b"]);
        assert_eq!(corpus.get("a").unwrap().tags.len(), 1);
        assert!(corpus.get("b").unwrap().tags.is_empty());
    }
}
