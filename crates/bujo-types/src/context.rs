use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of markdown file within the journal tree, derived from its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Daily,
    Monthly,
    Future,
    Collection,
    Index,
    /// Path matched none of the journal conventions. Entries from such files
    /// are indexed without date/month/collection context.
    Unknown,
}

/// Context a file's path contributes to every entry parsed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContext {
    pub kind: FileKind,
    /// Path relative to the journal data directory, forward slashes.
    pub file_path: String,
    /// Calendar date, daily logs only.
    pub date: Option<NaiveDate>,
    /// `YYYY-MM`, daily and monthly logs.
    pub month: Option<String>,
    /// Collection identity, optionally namespaced as `<type>/<name>`.
    pub collection: Option<String>,
    pub collection_type: Option<String>,
}

impl FileContext {
    /// Bare context carrying only the kind and path.
    pub fn new(kind: FileKind, file_path: impl Into<String>) -> Self {
        Self {
            kind,
            file_path: file_path.into(),
            date: None,
            month: None,
            collection: None,
            collection_type: None,
        }
    }
}
