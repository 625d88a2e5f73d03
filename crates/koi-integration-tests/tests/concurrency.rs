//! # Concurrent Access
//!
//! Readers racing reloads must only ever observe complete snapshots, and
//! concurrent first callers must share a single lazy load.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use koi_schema::source::Documents;
use koi_schema::{
    compute_version, MemorySource, RawDocument, SchemaRegistry, SchemaResult, SchemaSource,
    TypeResolver,
};

const THRESHOLDS: [f64; 4] = [0.70, 0.75, 0.80, 0.85];

fn source_with(threshold: f64) -> MemorySource {
    MemorySource::new(vec![
        RawDocument::new(
            "project",
            format!(
                "---\nlabel: Project\nresolution:\n  folder: Projects\n  type_aliases: [proj]\n  \
                 similarity_threshold: {threshold}\n---\n"
            ),
        ),
        RawDocument::new(
            "campaign",
            format!(
                "---\nlabel: Campaign\nresolution:\n  folder: Campaigns\n  \
                 similarity_threshold: {threshold}\n---\n"
            ),
        ),
    ])
}

#[test]
fn readers_never_observe_torn_snapshots() {
    let registry = Arc::new(SchemaRegistry::default());
    registry.reload_from(&source_with(THRESHOLDS[0]));
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            let done = &done;
            scope.spawn(move || {
                let resolver = TypeResolver::new(registry);
                while !done.load(Ordering::Acquire) {
                    let snapshot = resolver.registry().snapshot();
                    assert_eq!(compute_version(snapshot.schemas()), snapshot.version());

                    // Both records come from the same build.
                    let project = snapshot.resolve("proj");
                    let campaign = snapshot.resolve("Campaign");
                    assert_eq!(project.type_key, "Project");
                    assert_eq!(project.similarity_threshold, campaign.similarity_threshold);
                    assert!(THRESHOLDS.contains(&project.similarity_threshold));
                }
            });
        }

        for round in 0..200 {
            registry.reload_from(&source_with(THRESHOLDS[round % THRESHOLDS.len()]));
        }
        done.store(true, Ordering::Release);
    });
}

/// Memory source that counts discoveries and lingers in each one, so racing
/// first callers pile up behind the init lock.
#[derive(Debug)]
struct CountingSource {
    inner: MemorySource,
    discoveries: Arc<AtomicUsize>,
}

impl SchemaSource for CountingSource {
    fn discover(&self) -> SchemaResult<Documents<'_>> {
        self.discoveries.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        self.inner.discover()
    }

    fn describe(&self) -> String {
        format!("counting {}", self.inner.describe())
    }
}

#[test]
fn concurrent_first_calls_share_one_load() {
    let discoveries = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(SchemaRegistry::with_source(CountingSource {
        inner: source_with(0.80),
        discoveries: Arc::clone(&discoveries),
    }));
    assert!(!registry.is_loaded());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.snapshot()
            })
        })
        .collect();
    let snapshots: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(registry.is_loaded());
    assert_eq!(discoveries.load(Ordering::SeqCst), 1, "first callers must share one load");
    let first = &snapshots[0];
    for snapshot in &snapshots[1..] {
        assert!(Arc::ptr_eq(first, snapshot), "every first caller must get the same snapshot");
    }
    assert!(Arc::ptr_eq(first, &registry.snapshot()));
    assert_eq!(first.resolve("proj").similarity_threshold, 0.80);
    assert_eq!(discoveries.load(Ordering::SeqCst), 1);
}

#[test]
fn held_snapshot_survives_reload() {
    let registry = SchemaRegistry::default();
    let old = registry.reload_from(&source_with(0.70));
    let new = registry.reload_from(&source_with(0.85));

    assert_eq!(old.resolve("proj").similarity_threshold, 0.70);
    assert_eq!(new.resolve("proj").similarity_threshold, 0.85);
    assert_ne!(old.version(), new.version());
    assert!(Arc::ptr_eq(&new, &registry.snapshot()));
}
