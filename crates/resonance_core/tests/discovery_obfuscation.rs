use resonance_core::{
    is_discovered, mark_discovered, obfuscate, preview_text, ContentItem, DiscoveryChange,
    DiscoveryRepository, DiscoverySet, InMemoryDiscoveryRepository, ObfuscationOptions,
    DEFAULT_MASK_GLYPH,
};
use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn mark_discovered_example() {
    let result = mark_discovered("A", &DiscoverySet::new());
    assert!(is_discovered("A", &result));
    assert!(!is_discovered("B", &result));
}

#[test]
fn discovery_never_shrinks() {
    let mut set = DiscoverySet::new();
    for id in ["a", "b", "a", "c", "b"] {
        let next = mark_discovered(id, &set);
        assert!(next.len() >= set.len());
        assert!(set.iter().all(|known| next.contains(known)));
        set = next;
    }
    assert_eq!(set.len(), 3);
}

#[test]
fn obfuscate_full_reveal_is_identity_for_alphanumerics() {
    let text = "Tidewater1987";
    assert_eq!(obfuscate(text, "seed", 1.0, DEFAULT_MASK_GLYPH), text);
}

#[test]
fn obfuscate_zero_reveal_masks_all_letters_and_digits() {
    let text = "It's 3 a.m. — the sea, again.";
    let masked = obfuscate(text, "seed", 0.0, '*');
    assert_eq!(masked, "**'* * *.*. — *** ***, *****.");
    assert_eq!(masked.chars().count(), text.chars().count());
}

#[test]
fn obfuscate_is_deterministic_and_key_sensitive() {
    let text = "the quiet arithmetic of tides and salt and rain";
    let first = obfuscate(text, "post-7", 0.5, '#');
    assert_eq!(first, obfuscate(text, "post-7", 0.5, '#'));
    assert_ne!(first, obfuscate(text, "post-8", 0.5, '#'));
    assert!(first.contains('#'));
    assert!(first.chars().any(|ch| ch.is_alphabetic()));
}

#[test]
fn obfuscate_clamps_ratio() {
    let text = "abc";
    assert_eq!(obfuscate(text, "k", -3.0, '#'), "###");
    assert_eq!(obfuscate(text, "k", 3.0, '#'), "abc");
}

#[test]
fn preview_switches_once_item_is_discovered() {
    let item = ContentItem::new("essay", "Essay")
        .unwrap()
        .with_excerpt("Nothing here, yet.");
    let options = ObfuscationOptions::default();
    let repo = InMemoryDiscoveryRepository::new();

    let before = preview_text(&item, &repo.get(), &options);
    assert_ne!(before, item.excerpt);
    assert!(before.contains(", "));

    repo.add("essay");
    assert_eq!(preview_text(&item, &repo.get(), &options), item.excerpt);
}

#[test]
fn listeners_fire_once_per_new_id_across_handles() {
    let repo = InMemoryDiscoveryRepository::new();
    let other_view = repo.clone();
    let seen = Arc::new(Mutex::new(Vec::<DiscoveryChange>::new()));
    let sink = Arc::clone(&seen);
    repo.subscribe(Arc::new(move |change: &DiscoveryChange| {
        sink.lock().unwrap().push(change.clone());
    }));

    assert!(other_view.add("a"));
    assert!(!other_view.add("a"));
    assert!(repo.add("b"));

    let changes = seen.lock().unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].added, vec!["a".to_string()]);
    assert_eq!(changes[1].set.len(), 2);
    assert!(is_discovered("a", &repo.get()));
}

#[test]
fn concurrent_writers_converge_to_union() {
    let repo = InMemoryDiscoveryRepository::new();
    let handles = (0..8)
        .map(|worker| {
            let repo = repo.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    repo.add(&format!("item-{}", (worker * 13 + i) % 120));
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let expected = (0..8)
        .flat_map(|worker| (0..50).map(move |i| format!("item-{}", (worker * 13 + i) % 120)))
        .collect::<DiscoverySet>();
    assert_eq!(repo.get(), expected);
}

#[test]
fn merge_applies_union_wins() {
    let repo = InMemoryDiscoveryRepository::with_set(["a", "b"].into_iter().collect());
    let incoming = ["b", "c", "d"].into_iter().collect::<DiscoverySet>();
    assert_eq!(repo.merge(&incoming), 2);
    assert_eq!(repo.merge(&incoming), 0);
    assert_eq!(repo.get().iter().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
}

#[test]
fn corrupt_payload_loads_as_empty_store() {
    let repo = InMemoryDiscoveryRepository::from_payload("[\"a\", ");
    assert!(repo.get().is_empty());

    let restored = InMemoryDiscoveryRepository::from_payload(r#"["x","y"]"#);
    assert_eq!(restored.get().to_payload(), r#"["x","y"]"#);
}

#[test]
fn padded_id_is_discovered_after_marking() {
    let marked = mark_discovered(" A ", &DiscoverySet::new());
    assert!(is_discovered(" A ", &marked));

    let repo = InMemoryDiscoveryRepository::new();
    assert!(repo.add("  essay "));
    assert!(repo.get().contains("  essay "));
    assert!(!repo.add("essay"));
}

#[test]
fn concurrent_changes_are_ordered_by_revision() {
    let repo = InMemoryDiscoveryRepository::new();
    let seen = Arc::new(Mutex::new(Vec::<DiscoveryChange>::new()));
    let sink = Arc::clone(&seen);
    repo.subscribe(Arc::new(move |change: &DiscoveryChange| {
        sink.lock().unwrap().push(change.clone());
    }));

    let handles = (0..6)
        .map(|worker| {
            let repo = repo.clone();
            thread::spawn(move || {
                for i in 0..20 {
                    repo.add(&format!("w{worker}-{i}"));
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut changes = seen.lock().unwrap().clone();
    assert_eq!(changes.len(), 120);
    changes.sort_by_key(|change| change.revision);
    for (index, change) in changes.iter().enumerate() {
        assert_eq!(change.revision, index as u64 + 1);
        assert_eq!(change.set.len(), index + 1);
    }
    for pair in changes.windows(2) {
        assert!(pair[0].set.iter().all(|id| pair[1].set.contains(id)));
    }
    assert_eq!(changes.last().unwrap().set, repo.get());
    assert_eq!(repo.revision(), 120);
}
