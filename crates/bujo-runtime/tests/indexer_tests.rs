use bujo_index::{EntryRecord, Store};
use bujo_runtime::{Config, IndexProgress, Indexer};
use bujo_testing::JournalWorld;
use bujo_types::{EntryType, Signifier, TaskStatus};
use chrono::NaiveDate;

fn indexer_for<'a>(world: &JournalWorld, store: &'a mut Store) -> Indexer<'a> {
    let config = Config::for_dir(world.journal_dir());
    Indexer::new(&config, store).unwrap()
}

fn snapshot(store: &Store, file: &str) -> Vec<EntryRecord> {
    store.entries_by_file(file).unwrap()
}

#[test]
fn test_full_reindex_counts_files() {
    let world = JournalWorld::new()
        .with_daily("2024-12-03", &["# Header", "* [ ] Buy milk", "- Note"])
        .with_monthly("2024-12", &["[ ] Monthly goal"])
        .with_collection("reading", &["- Dune"]);

    let mut store = Store::open_in_memory().unwrap();
    let report = indexer_for(&world, &mut store)
        .full_reindex(|_| {})
        .unwrap();

    assert_eq!(report.indexed, 3);
    assert!(report.failures.is_empty());
    assert_eq!(store.list_indexed_files().unwrap().len(), 3);
}

#[test]
fn test_full_reindex_is_idempotent() {
    let world = JournalWorld::new()
        .with_daily("2024-12-03", &["* [ ] Buy milk", "○ Standup", "- Note"])
        .with_collection("projects/web", &["[ ] Draft layout", "[ ] Draft layout"]);

    let mut store = Store::open_in_memory().unwrap();

    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();
    let first_daily = snapshot(&store, "daily/2024-12-03.md");
    let first_project = snapshot(&store, "collections/projects/web.md");

    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();
    let second_daily = snapshot(&store, "daily/2024-12-03.md");
    let second_project = snapshot(&store, "collections/projects/web.md");

    let strip = |records: Vec<EntryRecord>| {
        records
            .into_iter()
            .map(|r| (r.entry_ref, r.line_number, r.content, r.status))
            .collect::<Vec<_>>()
    };

    assert_eq!(strip(first_daily), strip(second_daily));
    assert_eq!(strip(first_project), strip(second_project));
}

#[test]
fn test_incremental_noop_returns_zero() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Task"]);
    let mut store = Store::open_in_memory().unwrap();

    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();

    let first = indexer_for(&world, &mut store)
        .incremental_reindex(|_| {})
        .unwrap();
    assert_eq!(first.changed(), 0);
    assert_eq!(first.skipped, 1);

    let second = indexer_for(&world, &mut store)
        .incremental_reindex(|_| {})
        .unwrap();
    assert_eq!(second.changed(), 0);
}

#[test]
fn test_incremental_touches_only_the_changed_file() {
    let world = JournalWorld::new()
        .with_daily("2024-12-03", &["[ ] Task A"])
        .with_daily("2024-12-04", &["[ ] Task B", "- Note B"]);

    let mut store = Store::open_in_memory().unwrap();
    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();

    let untouched_before = snapshot(&store, "daily/2024-12-04.md");
    let untouched_hash_before = store
        .get_file_hash_record("daily/2024-12-04.md")
        .unwrap()
        .unwrap();

    world
        .write_file("daily/2024-12-03.md", &["[x] Task A", "[ ] Task C"])
        .unwrap();

    let report = indexer_for(&world, &mut store)
        .incremental_reindex(|_| {})
        .unwrap();
    assert_eq!(report.changed(), 1);
    assert_eq!(report.indexed, 1);

    let changed = snapshot(&store, "daily/2024-12-03.md");
    assert_eq!(changed.len(), 2);
    assert_eq!(changed[0].status, Some(TaskStatus::Complete));

    let untouched_after = snapshot(&store, "daily/2024-12-04.md");
    assert_eq!(untouched_before, untouched_after);

    let untouched_hash_after = store
        .get_file_hash_record("daily/2024-12-04.md")
        .unwrap()
        .unwrap();
    assert_eq!(untouched_hash_before.content_hash, untouched_hash_after.content_hash);
    assert_eq!(untouched_hash_before.indexed_at, untouched_hash_after.indexed_at);
}

#[test]
fn test_incremental_detects_deletion() {
    let world = JournalWorld::new()
        .with_daily("2024-12-03", &["[ ] Task A"])
        .with_daily("2024-12-04", &["[ ] Task B"]);

    let mut store = Store::open_in_memory().unwrap();
    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();

    world.remove_file("daily/2024-12-04.md").unwrap();

    let report = indexer_for(&world, &mut store)
        .incremental_reindex(|_| {})
        .unwrap();
    assert_eq!(report.removed, 1);
    assert_eq!(report.changed(), 1);

    assert!(snapshot(&store, "daily/2024-12-04.md").is_empty());
    assert_eq!(store.get_file_hash("daily/2024-12-04.md").unwrap(), None);
    assert_eq!(
        store.list_indexed_files().unwrap(),
        vec!["daily/2024-12-03.md"]
    );
}

#[test]
fn test_incremental_picks_up_new_file() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Task A"]);
    let mut store = Store::open_in_memory().unwrap();
    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();

    world.write_file("future.md", &["[ ] Plan trip"]).unwrap();

    let report = indexer_for(&world, &mut store)
        .incremental_reindex(|_| {})
        .unwrap();
    assert_eq!(report.indexed, 1);
    assert_eq!(snapshot(&store, "future.md").len(), 1);
}

#[test]
fn test_reindex_file_updates_single_record() {
    // A priority task is completed in place; only its own file is touched
    let world = JournalWorld::new()
        .with_daily("2024-12-03", &["* [ ] Buy milk"])
        .with_daily("2024-12-04", &["[ ] Unrelated"]);

    let mut store = Store::open_in_memory().unwrap();
    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 12, 3).unwrap();
    let before = store.entries_by_date(date).unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].content, "Buy milk");
    assert_eq!(before[0].signifier, Some(Signifier::Priority));
    assert_eq!(before[0].status, Some(TaskStatus::Open));

    let other_hash_before = store
        .get_file_hash_record("daily/2024-12-04.md")
        .unwrap()
        .unwrap();

    world
        .write_file("daily/2024-12-03.md", &["* [x] Buy milk"])
        .unwrap();
    indexer_for(&world, &mut store)
        .reindex_file(&world.path("daily/2024-12-03.md"))
        .unwrap();

    let after = store.entries_by_date(date).unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].status, Some(TaskStatus::Complete));
    assert_eq!(after[0].entry_ref, before[0].entry_ref);

    let other_hash_after = store
        .get_file_hash_record("daily/2024-12-04.md")
        .unwrap()
        .unwrap();
    assert_eq!(other_hash_before.content_hash, other_hash_after.content_hash);
    assert_eq!(other_hash_before.indexed_at, other_hash_after.indexed_at);
}

#[test]
fn test_reindex_missing_file_is_deletion() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Task A"]);
    let mut store = Store::open_in_memory().unwrap();
    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();

    world.remove_file("daily/2024-12-03.md").unwrap();
    indexer_for(&world, &mut store)
        .reindex_file(&world.path("daily/2024-12-03.md"))
        .unwrap();

    assert!(snapshot(&store, "daily/2024-12-03.md").is_empty());
    assert_eq!(store.get_file_hash("daily/2024-12-03.md").unwrap(), None);
}

#[test]
fn test_refs_stable_across_reindexes() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Task A", "- A note"]);
    let mut store = Store::open_in_memory().unwrap();

    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();
    let refs_before: Vec<_> = snapshot(&store, "daily/2024-12-03.md")
        .into_iter()
        .map(|r| r.entry_ref)
        .collect();

    indexer_for(&world, &mut store)
        .reindex_file(&world.path("daily/2024-12-03.md"))
        .unwrap();
    let refs_after: Vec<_> = snapshot(&store, "daily/2024-12-03.md")
        .into_iter()
        .map(|r| r.entry_ref)
        .collect();

    assert_eq!(refs_before, refs_after);
}

#[test]
fn test_duplicate_lines_get_distinct_refs() {
    let world = JournalWorld::new().with_daily(
        "2024-12-03",
        &["[ ] Water plants", "[ ] Water plants", "[ ] Water plants"],
    );
    let mut store = Store::open_in_memory().unwrap();

    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();

    let records = snapshot(&store, "daily/2024-12-03.md");
    assert_eq!(records.len(), 3);

    let mut refs: Vec<_> = records.iter().map(|r| r.entry_ref.clone()).collect();
    refs.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    refs.dedup();
    assert_eq!(refs.len(), 3, "colliding entries must be disambiguated");

    // Disambiguation is deterministic: a second full rebuild reproduces the
    // same refs for the same collision history
    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();
    let again: Vec<_> = snapshot(&store, "daily/2024-12-03.md")
        .into_iter()
        .map(|r| r.entry_ref)
        .collect();
    assert_eq!(
        records.into_iter().map(|r| r.entry_ref).collect::<Vec<_>>(),
        again
    );
}

#[test]
fn test_unknown_path_indexed_without_context() {
    let world = JournalWorld::new().with_file("scratch/notes.md", &["- Stray note"]);
    let mut store = Store::open_in_memory().unwrap();

    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();

    let records = snapshot(&store, "scratch/notes.md");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].entry_type, EntryType::Note);
    assert_eq!(records[0].entry_date, None);
    assert_eq!(records[0].collection, None);
    assert_eq!(records[0].month, None);
}

#[test]
fn test_unreadable_file_fails_without_blocking_others() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Good file"]);
    world
        .write_bytes("daily/2024-12-04.md", &[0xff, 0xfe, 0x00])
        .unwrap();

    let mut store = Store::open_in_memory().unwrap();
    let report = indexer_for(&world, &mut store)
        .full_reindex(|_| {})
        .unwrap();

    assert_eq!(report.indexed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, "daily/2024-12-04.md");

    // The good file made it in; the bad file has no hash record, so a later
    // run retries it
    assert_eq!(snapshot(&store, "daily/2024-12-03.md").len(), 1);
    assert_eq!(store.get_file_hash("daily/2024-12-04.md").unwrap(), None);
}

#[test]
fn test_progress_events_are_emitted() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Task"]);
    let mut store = Store::open_in_memory().unwrap();

    let mut events = Vec::new();
    indexer_for(&world, &mut store)
        .full_reindex(|event| events.push(event))
        .unwrap();

    assert!(matches!(events.first(), Some(IndexProgress::Scanning { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        IndexProgress::FileIndexed { path, entries: 1 } if path == "daily/2024-12-03.md"
    )));
    assert!(matches!(
        events.last(),
        Some(IndexProgress::Completed { indexed: 1, .. })
    ));
}

#[test]
fn test_entries_survive_round_trip_through_store() {
    let world = JournalWorld::new().with_daily(
        "2024-12-03",
        &["* [>] Call bank →months/2025-01.md", "! ○ Team offsite"],
    );
    let mut store = Store::open_in_memory().unwrap();
    indexer_for(&world, &mut store).full_reindex(|_| {}).unwrap();

    let records = snapshot(&store, "daily/2024-12-03.md");
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].entry_type, EntryType::Task);
    assert_eq!(records[0].status, Some(TaskStatus::Migrated));
    assert_eq!(records[0].signifier, Some(Signifier::Priority));
    assert_eq!(records[0].migrated_to.as_deref(), Some("months/2025-01.md"));
    assert_eq!(records[0].raw_line, "* [>] Call bank →months/2025-01.md");

    assert_eq!(records[1].entry_type, EntryType::Event);
    assert_eq!(records[1].signifier, Some(Signifier::Inspiration));
    assert_eq!(records[1].content, "Team offsite");
}
