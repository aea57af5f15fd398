use bujo_types::{EntryRef, EntryType, Signifier, TaskStatus};
use chrono::NaiveDate;
use serde::Serialize;

/// Indexed entry row.
///
/// One row per recognized line, fully replaced whenever its source file is
/// reindexed. `source_file` + `line_number` reflect the file as of the most
/// recent successful reindex of that file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryRecord {
    pub id: i64,
    /// Stable short identifier, unique within the store.
    pub entry_ref: EntryRef,
    pub source_file: String,
    pub line_number: i64,
    pub raw_line: String,
    pub entry_type: EntryType,
    pub status: Option<TaskStatus>,
    pub signifier: Option<Signifier>,
    pub content: String,
    pub entry_date: Option<NaiveDate>,
    pub collection: Option<String>,
    pub month: Option<String>,
    pub migrated_to: Option<String>,
    pub migrated_from: Option<String>,
    pub created_at: Option<String>,
}

/// Insert payload for one entry row; `id`/`created_at` are assigned by the
/// store.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub entry_ref: EntryRef,
    pub source_file: String,
    pub line_number: i64,
    pub raw_line: String,
    pub entry_type: EntryType,
    pub status: Option<TaskStatus>,
    pub signifier: Option<Signifier>,
    pub content: String,
    pub entry_date: Option<NaiveDate>,
    pub collection: Option<String>,
    pub month: Option<String>,
    pub migrated_to: Option<String>,
    pub migrated_from: Option<String>,
}

/// Last-seen content hash for an indexed file.
#[derive(Debug, Clone)]
pub struct FileHashRecord {
    pub file_path: String,
    pub content_hash: String,
    pub indexed_at: Option<String>,
}

/// Full-text search result with a ranked snippet.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub entry: EntryRecord,
    pub snippet: String,
}

/// Optional filters for task queries. All fields combine with AND.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub collection: Option<String>,
    pub signifier: Option<Signifier>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusTotals {
    pub total: i64,
    pub open: i64,
    pub complete: i64,
    pub migrated: i64,
    pub scheduled: i64,
    pub cancelled: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStats {
    pub month: String,
    pub total: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    pub collection: String,
    pub total: i64,
    pub completed: i64,
}

/// Aggregate task statistics, optionally scoped to a year/month.
#[derive(Debug, Clone, Serialize)]
pub struct JournalStats {
    pub overall: StatusTotals,
    pub monthly: Vec<MonthlyStats>,
    pub collections: Vec<CollectionStats>,
}

/// Kind of file mutation recorded for undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoKind {
    Add,
    Edit,
    Delete,
}

impl UndoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UndoKind::Add => "add",
            UndoKind::Edit => "edit",
            UndoKind::Delete => "delete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "add" => Some(UndoKind::Add),
            "edit" => Some(UndoKind::Edit),
            "delete" => Some(UndoKind::Delete),
            _ => None,
        }
    }
}

/// Recorded file mutation, newest-first reversible.
#[derive(Debug, Clone)]
pub struct UndoRecord {
    pub id: i64,
    pub kind: UndoKind,
    pub file_path: String,
    pub line_number: i64,
    pub old_content: Option<String>,
    pub new_content: Option<String>,
    pub timestamp: String,
}

/// Insert payload for an undo action; id/timestamp assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUndo {
    pub kind: UndoKind,
    pub file_path: String,
    pub line_number: i64,
    pub old_content: Option<String>,
    pub new_content: Option<String>,
}
