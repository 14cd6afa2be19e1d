use std::path::Path;
use std::sync::Arc;

use crate::registry::{fingerprint, FileRecord, FileRegistry};

#[test]
fn shared_registry_aliases_records_across_lists() {
    let registry = FileRegistry::shared(vec![
        FileRecord::with_content("/base/a.js", "a"),
        FileRecord::with_content("/base/b.js", "b"),
    ]);

    assert_eq!(registry.served.len(), 2);
    assert_eq!(registry.included.len(), 2);
    for (served, included) in registry.served.iter().zip(&registry.included) {
        assert!(Arc::ptr_eq(served, included));
    }
}

#[test]
fn with_content_populates_provenance() {
    let record = FileRecord::with_content("/base/a.js", "hello");

    assert_eq!(record.original_path, record.path);
    assert_eq!(record.content_path, None);
    assert!(!record.is_url);
    assert_eq!(record.content.as_deref(), Some("hello"));
    assert_eq!(record.content_hash, fingerprint(b"hello"));
}

#[test]
fn fingerprint_is_content_sensitive() {
    assert_eq!(fingerprint(b"same"), fingerprint(b"same"));
    assert_ne!(fingerprint(b"one"), fingerprint(b"two"));
}

#[test]
fn position_lookups_search_each_list() {
    let shared = Arc::new(FileRecord::with_content("/base/shared.js", ""));
    let served_only = Arc::new(FileRecord::with_content("/base/served-only.js", ""));
    let registry = FileRegistry::new(
        vec![Arc::clone(&served_only), Arc::clone(&shared)],
        vec![shared],
    );

    assert_eq!(registry.find_served(Path::new("/base/shared.js")), Some(1));
    assert_eq!(registry.find_included(Path::new("/base/shared.js")), Some(0));
    assert_eq!(
        registry.find_included(Path::new("/base/served-only.js")),
        None
    );
    assert_eq!(registry.find_served(Path::new("/base/missing.js")), None);
}
