use resonance_core::{
    build_similarity_graph, compute_layout, ContentItem, Corpus, DiscoveryRepository,
    EngineConfig, InMemoryDiscoveryRepository, LayoutPreset, ResonanceService, SurfacePreset,
};
use std::io::Write;
use std::sync::Arc;

fn sample_corpus() -> Corpus {
    Corpus::new(vec![
        ContentItem::new("tides", "On Tides")
            .unwrap()
            .with_tags(["Sea", "time"])
            .with_excerpt("The water keeps its own calendar.")
            .with_published_at(1_000),
        ContentItem::new("salt", "Salt")
            .unwrap()
            .with_tags(["sea", "kitchen"])
            .with_excerpt("Every recipe starts at the shore.")
            .with_published_at(2_000),
        ContentItem::new("clocks", "Clocks")
            .unwrap()
            .with_tags(["time"])
            .with_excerpt("Tick, and then the other thing.")
            .with_published_at(3_000),
        ContentItem::new("untitled", "Untitled")
            .unwrap()
            .with_published_at(4_000),
    ])
}

#[test]
fn map_is_memoized_for_an_unchanged_corpus() {
    let service = ResonanceService::new(EngineConfig::atlas(), InMemoryDiscoveryRepository::new());
    let corpus = sample_corpus();
    let first = service.map(&corpus);
    let second = service.map(&corpus.clone());
    assert!(Arc::ptr_eq(&first, &second));

    let shuffled = Corpus::new(corpus.items().iter().rev().cloned().collect::<Vec<_>>());
    let reordered = service.map(&shuffled);
    assert!(!Arc::ptr_eq(&first, &reordered));
    assert_eq!(reordered.nodes, first.nodes);
    assert_eq!(reordered.fingerprint, first.fingerprint);

    let mut grown = corpus.items().to_vec();
    grown.push(ContentItem::new("harbor", "Harbor").unwrap().with_tags(["sea"]));
    let third = service.map(&Corpus::new(grown));
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.nodes.len(), 5);
}

#[test]
fn map_recomputes_when_only_publish_dates_change() {
    let dated = |first: i64, second: i64| {
        Corpus::new(vec![
            ContentItem::new("a", "A").unwrap().with_published_at(first),
            ContentItem::new("b", "B").unwrap().with_published_at(second),
        ])
    };
    let service = ResonanceService::new(EngineConfig::atlas(), InMemoryDiscoveryRepository::new());
    let before = dated(1, 2);
    let after = dated(2, 1);

    assert_eq!(service.map(&before).nodes[0].item_id, "a");
    let served = service.map(&after);
    let fresh = compute_layout(&after, &service.config().layout);
    assert_eq!(served.nodes, fresh);
    assert_eq!(served.nodes[0].item_id, "b");
}

#[test]
fn map_recomputes_when_tags_differ_only_by_separators() {
    let tagged = |tags: &[&str]| {
        Corpus::new(vec![
            ContentItem::new("a", "A").unwrap().with_tags(tags.iter().copied()),
            ContentItem::new("b", "B").unwrap().with_tags(["x"]),
        ])
    };
    let service = ResonanceService::new(EngineConfig::atlas(), InMemoryDiscoveryRepository::new());
    let split = tagged(&["x", "y"]);
    let joined = tagged(&["x,y"]);

    assert_eq!(service.map(&split).edges.len(), 1);
    let served = service.map(&joined);
    assert_eq!(
        served.edges,
        build_similarity_graph(&joined, &service.config().similarity)
    );
    assert!(served.edges.is_empty());
}

#[test]
fn map_contains_layout_and_edges() {
    let service = ResonanceService::for_surface(SurfacePreset::Atlas, InMemoryDiscoveryRepository::new());
    let map = service.map(&sample_corpus());
    assert_eq!(map.nodes.len(), 4);
    assert!(map.edges.iter().all(|edge| !edge.touches("untitled")));
    assert!(map
        .edges
        .iter()
        .any(|edge| edge.a == "salt" && edge.b == "tides"));
}

#[test]
fn archive_surface_uses_radial_layout() {
    let service =
        ResonanceService::for_surface(SurfacePreset::Archive, InMemoryDiscoveryRepository::new());
    assert_eq!(service.config().layout.preset, LayoutPreset::Radial);
}

#[test]
fn echo_for_id_skips_current() {
    let service = ResonanceService::for_surface(SurfacePreset::Echo, InMemoryDiscoveryRepository::new());
    let corpus = sample_corpus();
    for item in corpus.items() {
        let echo = service.echo_for_id(&item.id, &corpus).unwrap();
        assert_ne!(echo.id, item.id);
    }
}

#[test]
fn tune_returns_a_known_id() {
    let service = ResonanceService::for_surface(SurfacePreset::Atlas, InMemoryDiscoveryRepository::new());
    let ids = vec!["c".to_string(), "b".to_string(), "a".to_string()];
    for _ in 0..50 {
        assert!(ids.contains(&service.tune(&ids)));
    }
    assert_eq!(service.tune(&[]), "");
}

#[test]
fn opening_an_item_reveals_its_preview() {
    let repo = InMemoryDiscoveryRepository::new();
    let service = ResonanceService::for_surface(SurfacePreset::Echo, repo.clone());
    let corpus = sample_corpus();
    let item = corpus.get("salt").unwrap();

    assert!(!service.is_discovered("salt"));
    assert_ne!(service.preview(item), item.excerpt);

    assert!(service.open_item("salt"));
    assert!(!service.open_item("salt"));
    assert_eq!(service.preview(item), item.excerpt);
    // Other handles on the same store observe the write.
    assert!(repo.get().contains("salt"));
}

#[test]
fn corpus_file_feeds_the_service() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"id": "a", "title": "A", "tags": ["x", "y"]}},
            {{"id": "b", "title": "B", "tags": ["y", "z"]}},
            {{"id": "c", "title": "C"}}
        ]"#
    )
    .unwrap();

    let corpus = Corpus::from_json_file(file.path()).unwrap();
    let service = ResonanceService::for_surface(SurfacePreset::Atlas, InMemoryDiscoveryRepository::new());
    let map = service.map(&corpus);
    assert_eq!(map.edges.len(), 1);
    assert!((map.edges[0].strength - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn missing_corpus_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Corpus::from_json_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, resonance_core::CorpusError::Io(_)));
}

#[test]
fn map_serializes_for_hosts() {
    let service = ResonanceService::for_surface(SurfacePreset::Atlas, InMemoryDiscoveryRepository::new());
    let map = service.map(&sample_corpus());
    let value = serde_json::to_value(map.as_ref()).unwrap();
    assert_eq!(value["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(value["fingerprint"], map.fingerprint);
}
