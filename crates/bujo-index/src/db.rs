use chrono::NaiveDate;
use rusqlite::{Connection, Transaction};
use std::path::Path;

use bujo_types::EntryRef;

use crate::{
    Result, queries,
    records::{
        EntryRecord, FileHashRecord, JournalStats, NewEntry, NewUndo, SearchHit, TaskFilter,
        UndoRecord,
    },
    schema,
};

/// SQLite-backed store for indexed entries, file hashes and undo history.
///
/// Holds derived state only: everything except refs and timestamps can be
/// rebuilt from the markdown files at any time.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;

        // WAL for concurrent readers, busy_timeout so a second process backs
        // off instead of failing immediately
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Start a transaction covering one logical unit of work (typically one
    /// file's clear+reinsert+hash update). Dropping the guard without
    /// committing rolls everything back.
    pub fn begin(&mut self) -> Result<StoreTx<'_>> {
        Ok(StoreTx {
            tx: self.conn.transaction()?,
        })
    }

    /// Wipe all entries and file hashes (full rebuild), atomically.
    pub fn clear_all(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        queries::entry::clear_all(&tx)?;
        tx.commit()?;
        Ok(())
    }

    pub fn clear_file(&self, source_file: &str) -> Result<()> {
        queries::entry::clear_file(&self.conn, source_file)
    }

    pub fn insert_entry(&self, entry: &NewEntry) -> Result<()> {
        queries::entry::insert(&self.conn, entry)
    }

    pub fn entry_ref_exists(&self, entry_ref: &EntryRef) -> Result<bool> {
        queries::entry::ref_exists(&self.conn, entry_ref)
    }

    pub fn entry_by_ref(&self, entry_ref: &EntryRef) -> Result<Option<EntryRecord>> {
        queries::entry::get_by_ref(&self.conn, entry_ref)
    }

    pub fn entry_by_ref_prefix(&self, prefix: &str) -> Result<Option<EntryRecord>> {
        queries::entry::get_by_ref_prefix(&self.conn, prefix)
    }

    pub fn entries_by_date(&self, date: NaiveDate) -> Result<Vec<EntryRecord>> {
        queries::entry::by_date(&self.conn, date)
    }

    pub fn entries_by_file(&self, source_file: &str) -> Result<Vec<EntryRecord>> {
        queries::entry::by_file(&self.conn, source_file)
    }

    pub fn entries_by_month(&self, month: &str) -> Result<Vec<EntryRecord>> {
        queries::entry::by_month(&self.conn, month)
    }

    pub fn entries_by_collection(&self, collection: &str) -> Result<Vec<EntryRecord>> {
        queries::entry::by_collection(&self.conn, collection)
    }

    pub fn tasks(&self, filter: &TaskFilter) -> Result<Vec<EntryRecord>> {
        queries::entry::tasks(&self.conn, filter)
    }

    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        queries::search::search(&self.conn, query, limit)
    }

    pub fn stats(&self, year: Option<i32>, month: Option<u32>) -> Result<JournalStats> {
        queries::stats::stats(&self.conn, year, month)
    }

    pub fn get_file_hash(&self, file_path: &str) -> Result<Option<String>> {
        queries::file_hash::get(&self.conn, file_path)
    }

    pub fn get_file_hash_record(&self, file_path: &str) -> Result<Option<FileHashRecord>> {
        queries::file_hash::get_record(&self.conn, file_path)
    }

    pub fn set_file_hash(&self, file_path: &str, content_hash: &str) -> Result<()> {
        queries::file_hash::set(&self.conn, file_path, content_hash)
    }

    pub fn delete_file_hash(&self, file_path: &str) -> Result<()> {
        queries::file_hash::delete(&self.conn, file_path)
    }

    pub fn list_indexed_files(&self) -> Result<Vec<String>> {
        queries::file_hash::list_paths(&self.conn)
    }

    pub fn push_undo(&self, action: &NewUndo) -> Result<()> {
        queries::undo::push(&self.conn, action)
    }

    pub fn pop_undo(&self) -> Result<Option<UndoRecord>> {
        queries::undo::pop(&self.conn)
    }

    pub fn peek_undo(&self) -> Result<Option<UndoRecord>> {
        queries::undo::peek(&self.conn)
    }

    pub fn trim_undo(&self, keep: usize) -> Result<()> {
        queries::undo::trim(&self.conn, keep)
    }

    pub fn vacuum(&self) -> Result<()> {
        self.conn.execute("VACUUM", [])?;
        Ok(())
    }
}

/// Transaction guard over the store.
///
/// Mirrors the store's write surface plus the lookups the indexer needs
/// mid-replacement (ref collision checks see rows inserted earlier in the
/// same transaction). `commit` consumes the guard; drop rolls back.
pub struct StoreTx<'a> {
    tx: Transaction<'a>,
}

impl StoreTx<'_> {
    pub fn clear_all(&self) -> Result<()> {
        queries::entry::clear_all(&self.tx)
    }

    pub fn clear_file(&self, source_file: &str) -> Result<()> {
        queries::entry::clear_file(&self.tx, source_file)
    }

    pub fn insert_entry(&self, entry: &NewEntry) -> Result<()> {
        queries::entry::insert(&self.tx, entry)
    }

    pub fn entry_ref_exists(&self, entry_ref: &EntryRef) -> Result<bool> {
        queries::entry::ref_exists(&self.tx, entry_ref)
    }

    pub fn set_file_hash(&self, file_path: &str, content_hash: &str) -> Result<()> {
        queries::file_hash::set(&self.tx, file_path, content_hash)
    }

    pub fn delete_file_hash(&self, file_path: &str) -> Result<()> {
        queries::file_hash::delete(&self.tx, file_path)
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}
