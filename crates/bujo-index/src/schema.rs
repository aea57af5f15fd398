use rusqlite::Connection;

use crate::Result;

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i32 = 3;

// NOTE: Store Design Rationale
//
// Why a derived index (not a database of record)?
// - Markdown files are the source of truth; users edit them with anything
// - The index exists for fast lookup/search without re-walking the tree
// - Wiping and rebuilding is always safe, so no migration machinery: a
//   schema version mismatch drops and recreates everything
//
// Why an external-content FTS5 table with triggers?
// - Search stays transactionally consistent with the entries table; a file's
//   clear+reinsert updates both in the same transaction with no separate
//   reindex step
//
// Why a file_hashes table?
// - Incremental reindex diffs stored content hashes against disk; a row
//   exists exactly for files that were successfully indexed at least once

pub fn init_schema(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version != SCHEMA_VERSION {
        drop_all_tables(conn)?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_ref TEXT UNIQUE NOT NULL,

            source_file TEXT NOT NULL,
            line_number INTEGER NOT NULL,
            raw_line TEXT NOT NULL,

            entry_type TEXT NOT NULL,
            status TEXT,
            signifier TEXT,
            content TEXT NOT NULL,

            entry_date TEXT,
            collection TEXT,
            month TEXT,

            migrated_to TEXT,
            migrated_from TEXT,

            created_at TEXT DEFAULT CURRENT_TIMESTAMP
        );

        CREATE VIRTUAL TABLE IF NOT EXISTS entries_fts USING fts5(
            content,
            content='entries',
            content_rowid='id'
        );

        CREATE TRIGGER IF NOT EXISTS entries_ai AFTER INSERT ON entries BEGIN
            INSERT INTO entries_fts(rowid, content) VALUES (new.id, new.content);
        END;

        CREATE TRIGGER IF NOT EXISTS entries_ad AFTER DELETE ON entries BEGIN
            INSERT INTO entries_fts(entries_fts, rowid, content)
            VALUES ('delete', old.id, old.content);
        END;

        CREATE TRIGGER IF NOT EXISTS entries_au AFTER UPDATE ON entries BEGIN
            INSERT INTO entries_fts(entries_fts, rowid, content)
            VALUES ('delete', old.id, old.content);
            INSERT INTO entries_fts(rowid, content) VALUES (new.id, new.content);
        END;

        CREATE TABLE IF NOT EXISTS file_hashes (
            file_path TEXT PRIMARY KEY,
            content_hash TEXT NOT NULL,
            indexed_at TEXT
        );

        CREATE TABLE IF NOT EXISTS undo_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            file_path TEXT NOT NULL,
            line_number INTEGER NOT NULL,
            old_content TEXT,
            new_content TEXT,
            timestamp TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entries_ref ON entries(entry_ref);
        CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(entry_date);
        CREATE INDEX IF NOT EXISTS idx_entries_type ON entries(entry_type);
        CREATE INDEX IF NOT EXISTS idx_entries_status ON entries(status);
        CREATE INDEX IF NOT EXISTS idx_entries_collection ON entries(collection);
        CREATE INDEX IF NOT EXISTS idx_entries_month ON entries(month);
        CREATE INDEX IF NOT EXISTS idx_entries_source ON entries(source_file);
        "#,
    )?;

    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}

fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS undo_history;
        DROP TABLE IF EXISTS file_hashes;
        DROP TABLE IF EXISTS entries_fts;
        DROP TABLE IF EXISTS entries;
        "#,
    )?;
    Ok(())
}
