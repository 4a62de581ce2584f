//! Content item model.
//!
//! # Responsibility
//! - Define the canonical tagged text item supplied by the content source.
//! - Normalize tags (trim, case-fold, collapse whitespace, dedupe).
//!
//! # Invariants
//! - `id` is never blank.
//! - `tags` only holds normalized, non-empty values.
//! - Missing or malformed tag payloads decode to an empty tag set.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stable identifier of a content item.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ItemId = String;

/// Validation errors for item construction and decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// Item id is empty or whitespace-only.
    EmptyId,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "content item id must not be empty"),
        }
    }
}

impl Error for ItemValidationError {}

/// One published piece of writing as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawContentItem")]
pub struct ContentItem {
    /// Stable unique id (slug or uuid string).
    pub id: ItemId,
    pub title: String,
    /// Short teaser; the text obfuscated for undiscovered items.
    pub excerpt: String,
    /// Full body text.
    pub content: String,
    /// Normalized tag set, serialized in sorted order.
    pub tags: BTreeSet<String>,
    /// Unix epoch milliseconds.
    pub published_at: Option<i64>,
}

impl ContentItem {
    /// Creates an item with empty text fields and no tags.
    ///
    /// # Errors
    /// - Returns `ItemValidationError::EmptyId` when `id` is blank.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, ItemValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ItemValidationError::EmptyId);
        }
        Ok(Self {
            id,
            title: title.into(),
            excerpt: String::new(),
            content: String::new(),
            tags: BTreeSet::new(),
            published_at: None,
        })
    }

    /// Replaces the tag set with the normalized form of `tags`.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_published_at(mut self, epoch_ms: i64) -> Self {
        self.published_at = Some(epoch_ms);
        self
    }

    /// Re-checks item invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.trim().is_empty() {
            return Err(ItemValidationError::EmptyId);
        }
        Ok(())
    }

    /// Whether this item shares at least one tag with `other`.
    pub fn shares_tag_with(&self, other: &ContentItem) -> bool {
        self.tags.intersection(&other.tags).next().is_some()
    }
}

/// Normalizes one tag value.
///
/// Returns `None` for blank input.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.to_lowercase())
}

/// Normalizes and deduplicates a tag list; blank values are dropped.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|tag| normalize_tag(tag.as_ref()))
        .collect()
}

/// Wire shape before validation and tag normalization.
///
/// Only used as the decoding intermediate for [`ContentItem`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawContentItem {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    content: String,
    #[serde(default, deserialize_with = "deserialize_lenient_tags")]
    tags: Vec<String>,
    #[serde(default)]
    published_at: Option<i64>,
}

impl TryFrom<RawContentItem> for ContentItem {
    type Error = ItemValidationError;

    fn try_from(raw: RawContentItem) -> Result<Self, Self::Error> {
        let item = ContentItem::new(raw.id, raw.title)?
            .with_excerpt(raw.excerpt)
            .with_content(raw.content)
            .with_tags(raw.tags);
        Ok(ContentItem {
            published_at: raw.published_at,
            ..item
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientTags {
    List(Vec<LenientTag>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientTag {
    Text(String),
    Other(IgnoredAny),
}

// Non-array payloads and non-string entries are dropped instead of failing the item.
fn deserialize_lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match LenientTags::deserialize(deserializer)? {
        LenientTags::List(values) => values
            .into_iter()
            .filter_map(|value| match value {
                LenientTag::Text(text) => Some(text),
                LenientTag::Other(_) => None,
            })
            .collect(),
        LenientTags::Other(_) => Vec::new(),
    };
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::{normalize_tag, normalize_tags, ContentItem, ItemValidationError};

    #[test]
    fn normalize_tag_trims_folds_and_collapses() {
        assert_eq!(
            normalize_tag("  Slow   Reading\t").as_deref(),
            Some("slow reading")
        );
        assert_eq!(normalize_tag("   "), None);
    }

    #[test]
    fn normalize_tags_dedupes_case_variants() {
        let tags = normalize_tags(["Work", "work ", "WORK", ""]);
        assert_eq!(tags.len(), 1);
        assert!(tags.contains("work"));
    }

    #[test]
    fn new_rejects_blank_id() {
        let err = ContentItem::new("  ", "untitled").unwrap_err();
        assert_eq!(err, ItemValidationError::EmptyId);
    }

    #[test]
    fn shares_tag_with_checks_intersection() {
        let a = ContentItem::new("a", "A").unwrap().with_tags(["x", "y"]);
        let b = ContentItem::new("b", "B").unwrap().with_tags(["Y"]);
        let c = ContentItem::new("c", "C").unwrap();
        assert!(a.shares_tag_with(&b));
        assert!(!a.shares_tag_with(&c));
    }
}
