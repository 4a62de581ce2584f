//! Resonance use-case service.
//!
//! # Responsibility
//! - Expose surface-level entry points (map, echo, tune, preview, open).
//! - Memoize the derived map (layout + graph) by exact corpus key.
//! - Route discovery reads/writes through the injected repository.
//!
//! # Invariants
//! - Service APIs never bypass engine functions; they only compose them.
//! - A cached map is reused only for a corpus with an equal `CorpusKey`.

use crate::config::{EngineConfig, SurfacePreset};
use crate::discovery::repository::DiscoveryRepository;
use crate::discovery::set::is_discovered;
use crate::layout::{compute_layout, LayoutNode};
use crate::model::corpus::{Corpus, CorpusKey};
use crate::model::item::ContentItem;
use crate::obfuscation::preview_text;
use crate::selection::echo::pick_echo_detailed;
use crate::selection::recency::pick_weighted_recent;
use crate::similarity::graph::{build_similarity_graph, SimilarityEdge};
use log::{debug, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Errors from resonance service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResonanceServiceError {
    /// Requested item id is not part of the corpus.
    ItemNotFound(String),
}

impl Display for ResonanceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound(id) => write!(f, "content item not found: {id}"),
        }
    }
}

impl Error for ResonanceServiceError {}

/// Derived structures for map-style surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResonanceMap {
    /// Corpus fingerprint this map was computed for.
    pub fingerprint: u32,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<SimilarityEdge>,
}

/// Service facade over the engine and a discovery repository.
pub struct ResonanceService<R: DiscoveryRepository> {
    config: EngineConfig,
    discovery: R,
    cached_map: Mutex<Option<(CorpusKey, Arc<ResonanceMap>)>>,
}

impl<R: DiscoveryRepository> ResonanceService<R> {
    /// Creates a service with explicit configuration.
    pub fn new(config: EngineConfig, discovery: R) -> Self {
        Self {
            config,
            discovery,
            cached_map: Mutex::new(None),
        }
    }

    /// Creates a service using a named surface preset.
    pub fn for_surface(surface: SurfacePreset, discovery: R) -> Self {
        info!(
            "event=service_init module=service status=ok surface={}",
            surface.as_str()
        );
        Self::new(surface.config(), discovery)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn discovery(&self) -> &R {
        &self.discovery
    }

    /// Returns layout and graph for `corpus`, reusing the last result when
    /// ids, tags, publish dates and supply order are all unchanged.
    pub fn map(&self, corpus: &Corpus) -> Arc<ResonanceMap> {
        let key = corpus.key();
        let fingerprint = corpus.fingerprint();
        let mut cached = self
            .cached_map
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some((cached_key, map)) = cached.as_ref() {
            if *cached_key == key {
                debug!(
                    "event=map_compute module=service status=cached fingerprint={:08x}",
                    fingerprint
                );
                return Arc::clone(map);
            }
        }

        let started_at = Instant::now();
        let map = Arc::new(ResonanceMap {
            fingerprint,
            nodes: compute_layout(corpus, &self.config.layout),
            edges: build_similarity_graph(corpus, &self.config.similarity),
        });
        info!(
            "event=map_compute module=service status=ok fingerprint={:08x} items={} edges={} duration_us={}",
            fingerprint,
            corpus.len(),
            map.edges.len(),
            started_at.elapsed().as_micros()
        );
        *cached = Some((key, Arc::clone(&map)));
        map
    }

    /// Echo for `current`; returns `current` when nothing else exists.
    pub fn echo_for<'a>(&self, current: &'a ContentItem, corpus: &'a Corpus) -> &'a ContentItem {
        let pick = pick_echo_detailed(current, corpus.items(), &self.config.echo);
        debug!(
            "event=echo_pick module=service status=ok current={} picked={} anomaly={} score={:?}",
            current.id, pick.item.id, pick.anomaly, pick.score
        );
        pick.item
    }

    /// Echo for the item with `id`.
    ///
    /// # Errors
    /// - Returns `ItemNotFound` when `id` is not in `corpus`.
    pub fn echo_for_id<'a>(
        &self,
        id: &str,
        corpus: &'a Corpus,
    ) -> Result<&'a ContentItem, ResonanceServiceError> {
        let current = corpus
            .get(id.trim())
            .ok_or_else(|| ResonanceServiceError::ItemNotFound(id.to_string()))?;
        Ok(self.echo_for(current, corpus))
    }

    /// Recency-weighted "tune" pick over ids ordered most-recent-first.
    pub fn tune(&self, ids_by_recency: &[String]) -> String {
        pick_weighted_recent(ids_by_recency, &self.config.recency)
    }

    /// Excerpt as the current viewer should see it.
    pub fn preview(&self, item: &ContentItem) -> String {
        preview_text(item, &self.discovery.get(), &self.config.obfuscation)
    }

    pub fn is_discovered(&self, id: &str) -> bool {
        is_discovered(id, &self.discovery.get())
    }

    /// Records that the viewer opened `id`; returns `true` on first open.
    pub fn open_item(&self, id: &str) -> bool {
        let added = self.discovery.add(id);
        if added {
            info!("event=item_discovered module=service status=ok");
        }
        added
    }
}
