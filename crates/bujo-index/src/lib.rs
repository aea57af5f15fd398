// SQLite side-car index
// Derived state only; the markdown files stay the source of truth

mod db;
mod error;
mod queries;
mod records;
mod schema;

// Public API
pub use db::{Store, StoreTx};
pub use error::{Error, Result};
pub use records::{
    CollectionStats, EntryRecord, FileHashRecord, JournalStats, MonthlyStats, NewEntry, NewUndo,
    SearchHit, StatusTotals, TaskFilter, UndoKind, UndoRecord,
};
pub use schema::SCHEMA_VERSION;
