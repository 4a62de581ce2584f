//! Deterministic content-resonance engine.
//! This crate is the single source of truth for layout, similarity, selection
//! and discovery invariants; UI surfaces only consume its results.

pub mod config;
pub mod discovery;
pub mod layout;
pub mod logging;
pub mod model;
pub mod obfuscation;
pub mod seed;
pub mod selection;
pub mod service;
pub mod similarity;

pub use config::{ConfigError, EngineConfig, SurfacePreset};
pub use discovery::{
    is_discovered, mark_discovered, DiscoveryChange, DiscoveryListener, DiscoveryRepository,
    DiscoverySet, InMemoryDiscoveryRepository, SubscriptionId,
};
pub use layout::{
    compute_layout, compute_layout_with, GoldenSpiral, LayoutNode, LayoutOptions, LayoutPreset,
    LayoutStrategy, Radial,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::corpus::{Corpus, CorpusError, CorpusKey};
pub use model::item::{normalize_tag, normalize_tags, ContentItem, ItemId, ItemValidationError};
pub use obfuscation::{obfuscate, preview_text, ObfuscationOptions, DEFAULT_MASK_GLYPH};
pub use seed::{hash, Prng};
pub use selection::echo::{pick_echo, pick_echo_detailed, EchoOptions, EchoPick};
pub use selection::recency::{
    pick_weighted_recent, pick_weighted_recent_with, recency_weights, RecencyOptions,
};
pub use service::resonance_service::{ResonanceMap, ResonanceService, ResonanceServiceError};
pub use similarity::graph::{build_similarity_graph, neighbors, SimilarityEdge, SimilarityOptions};
pub use similarity::score::{
    jaccard, jitter, overlap_count, resonance_score, shared_tags, ResonanceWeights,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
