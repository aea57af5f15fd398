use bujo_index::UndoKind;
use bujo_runtime::{Config, Journal};
use bujo_testing::JournalWorld;
use bujo_types::TaskStatus;

#[test]
fn test_open_and_sync_first_run_builds_everything() {
    let world = JournalWorld::new()
        .with_daily("2024-12-03", &["[ ] Task A"])
        .with_collection("reading", &["- Dune"]);

    let config = Config::for_dir(world.journal_dir());
    let (journal, report) = Journal::open_and_sync(config).unwrap();

    assert_eq!(report.indexed, 2);
    assert_eq!(journal.store().list_indexed_files().unwrap().len(), 2);
}

#[test]
fn test_open_and_sync_repairs_external_edits() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Task A"]);
    let config = Config::for_dir(world.journal_dir());

    let (journal, _) = Journal::open_and_sync(config.clone()).unwrap();
    drop(journal);

    // Edited behind the journal's back between invocations
    world
        .write_file("daily/2024-12-03.md", &["[x] Task A"])
        .unwrap();

    let (journal, report) = Journal::open_and_sync(config).unwrap();
    assert_eq!(report.changed(), 1);

    let records = journal
        .store()
        .entries_by_file("daily/2024-12-03.md")
        .unwrap();
    assert_eq!(records[0].status, Some(TaskStatus::Complete));
}

#[test]
fn test_open_and_sync_respects_auto_reindex_off() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Task A"]);
    let mut config = Config::for_dir(world.journal_dir());
    config.index.auto_reindex = false;

    let (journal, _) = Journal::open_and_sync(config.clone()).unwrap();
    drop(journal);

    world
        .write_file("daily/2024-12-03.md", &["[x] Task A"])
        .unwrap();

    let (journal, report) = Journal::open_and_sync(config).unwrap();
    assert_eq!(report.changed(), 0);

    // Store is allowed to be stale until the next explicit sweep
    let records = journal
        .store()
        .entries_by_file("daily/2024-12-03.md")
        .unwrap();
    assert_eq!(records[0].status, Some(TaskStatus::Open));
}

#[test]
fn test_append_entry_writes_and_indexes() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["# Header"]);
    let config = Config::for_dir(world.journal_dir());
    let (mut journal, _) = Journal::open_and_sync(config).unwrap();

    let file = world.path("daily/2024-12-03.md");
    let line_number = journal.append_entry(&file, "[ ] Buy milk").unwrap();
    assert_eq!(line_number, 2);

    let records = journal
        .store()
        .entries_by_file("daily/2024-12-03.md")
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "Buy milk");
    assert_eq!(records[0].line_number, 2);
}

#[test]
fn test_update_entry_line_and_undo() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Buy milk"]);
    let config = Config::for_dir(world.journal_dir());
    let (mut journal, _) = Journal::open_and_sync(config).unwrap();

    let file = world.path("daily/2024-12-03.md");
    journal.update_entry_line(&file, 1, "[x] Buy milk").unwrap();

    let records = journal
        .store()
        .entries_by_file("daily/2024-12-03.md")
        .unwrap();
    assert_eq!(records[0].status, Some(TaskStatus::Complete));

    let undone = journal.undo_last().unwrap().unwrap();
    assert_eq!(undone.kind, UndoKind::Edit);

    let records = journal
        .store()
        .entries_by_file("daily/2024-12-03.md")
        .unwrap();
    assert_eq!(records[0].status, Some(TaskStatus::Open));
    assert_eq!(records[0].raw_line, "[ ] Buy milk");
}

#[test]
fn test_update_out_of_range_line_is_an_error() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Buy milk"]);
    let config = Config::for_dir(world.journal_dir());
    let (mut journal, _) = Journal::open_and_sync(config).unwrap();

    let file = world.path("daily/2024-12-03.md");
    let result = journal.update_entry_line(&file, 9, "[x] Buy milk");
    assert!(result.is_err());
}

#[test]
fn test_delete_entry_line_and_undo() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Keep", "[ ] Remove"]);
    let config = Config::for_dir(world.journal_dir());
    let (mut journal, _) = Journal::open_and_sync(config).unwrap();

    let file = world.path("daily/2024-12-03.md");
    journal.delete_entry_line(&file, 2).unwrap();

    let records = journal
        .store()
        .entries_by_file("daily/2024-12-03.md")
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "Keep");

    let undone = journal.undo_last().unwrap().unwrap();
    assert_eq!(undone.kind, UndoKind::Delete);

    let records = journal
        .store()
        .entries_by_file("daily/2024-12-03.md")
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].content, "Remove");
    assert_eq!(records[1].line_number, 2);
}

#[test]
fn test_undo_append_removes_the_line() {
    let world = JournalWorld::new().with_daily("2024-12-03", &["[ ] Existing"]);
    let config = Config::for_dir(world.journal_dir());
    let (mut journal, _) = Journal::open_and_sync(config).unwrap();

    let file = world.path("daily/2024-12-03.md");
    journal.append_entry(&file, "[ ] Added").unwrap();
    assert_eq!(
        journal
            .store()
            .entries_by_file("daily/2024-12-03.md")
            .unwrap()
            .len(),
        2
    );

    let undone = journal.undo_last().unwrap().unwrap();
    assert_eq!(undone.kind, UndoKind::Add);

    let records = journal
        .store()
        .entries_by_file("daily/2024-12-03.md")
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "Existing");
}

#[test]
fn test_undo_with_empty_history() {
    let world = JournalWorld::new();
    let config = Config::for_dir(world.journal_dir());
    let (mut journal, _) = Journal::open_and_sync(config).unwrap();

    assert!(journal.undo_last().unwrap().is_none());
}

#[test]
fn test_journal_bootstraps_directory_layout() {
    let world = JournalWorld::new();
    let config = Config::for_dir(world.journal_dir());
    let (journal, _) = Journal::open_and_sync(config).unwrap();

    let data_dir = &journal.config().data_dir;
    assert!(data_dir.join("daily").is_dir());
    assert!(data_dir.join("months").is_dir());
    assert!(data_dir.join("collections/projects").is_dir());
}

#[test]
fn test_search_through_journal() {
    let world = JournalWorld::new()
        .with_daily("2024-12-03", &["[ ] Call dentist", "- Water the plants"]);
    let config = Config::for_dir(world.journal_dir());
    let (journal, _) = Journal::open_and_sync(config).unwrap();

    let hits = journal.store().search("dentist", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].entry.content, "Call dentist");
}
