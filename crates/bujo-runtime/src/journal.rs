use std::path::{Path, PathBuf};

use bujo_core::resolve_context;
use bujo_index::{NewUndo, Store, UndoKind, UndoRecord};
use bujo_types::SignifierMap;

use crate::config::Config;
use crate::indexer::{IndexReport, Indexer};
use crate::storage::fs;
use crate::{Error, Result};

/// Undo actions retained per journal.
const UNDO_HISTORY_KEEP: usize = 50;

/// The journal: configuration plus the derived store, constructed once and
/// passed to whatever needs it. No global state.
///
/// Files remain the source of truth; every mutation goes through the
/// mutation seam here, which writes the file, records an undo action, and
/// resynchronizes that one file's records.
pub struct Journal {
    config: Config,
    signifiers: SignifierMap,
    store: Store,
}

impl Journal {
    /// Open the store for a configuration. Validates the signifier table and
    /// bootstraps the journal directory layout.
    pub fn open(config: Config) -> Result<Self> {
        let signifiers = config.signifier_map()?;
        fs::ensure_journal_dirs(&config.data_dir, &config.collection_types)?;
        let store = Store::open(&config.cache_db)?;

        Ok(Self {
            config,
            signifiers,
            store,
        })
    }

    /// Open and apply the startup resync policy: full rebuild when no cache
    /// exists yet, incremental when `index.auto_reindex` is on, otherwise
    /// nothing.
    pub fn open_and_sync(config: Config) -> Result<(Self, IndexReport)> {
        let first_run = !config.cache_db.exists();
        let auto_reindex = config.index.auto_reindex;
        let mut journal = Self::open(config)?;

        let report = if first_run {
            journal.full_reindex()?
        } else if auto_reindex {
            journal.incremental_reindex()?
        } else {
            IndexReport::default()
        };

        Ok((journal, report))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn signifiers(&self) -> &SignifierMap {
        &self.signifiers
    }

    pub fn indexer(&mut self) -> Indexer<'_> {
        Indexer::with_signifiers(
            self.config.data_dir.clone(),
            self.signifiers.clone(),
            &mut self.store,
        )
    }

    pub fn full_reindex(&mut self) -> Result<IndexReport> {
        self.indexer().full_reindex(|_| {})
    }

    pub fn incremental_reindex(&mut self) -> Result<IndexReport> {
        self.indexer().incremental_reindex(|_| {})
    }

    pub fn reindex_file(&mut self, path: &Path) -> Result<()> {
        self.indexer().reindex_file(path)
    }

    /// Append a line to a journal file and resync it. Returns the new
    /// 1-based line number.
    ///
    /// The file mutation is never rolled back: if the resync fails the error
    /// surfaces, the store goes transiently stale, and the next incremental
    /// run repairs it.
    pub fn append_entry(&mut self, file: &Path, line: &str) -> Result<usize> {
        let line_number = fs::append_line(file, line)?;
        self.record_undo(NewUndo {
            kind: UndoKind::Add,
            file_path: self.rel_path(file),
            line_number: line_number as i64,
            old_content: None,
            new_content: Some(line.to_string()),
        })?;

        self.reindex_file(file)?;
        Ok(line_number)
    }

    /// Replace a line in a journal file and resync it.
    pub fn update_entry_line(&mut self, file: &Path, line_number: usize, new: &str) -> Result<()> {
        let old = fs::update_line(file, line_number, new)?.ok_or_else(|| {
            Error::InvalidOperation(format!(
                "line {} out of range in {}",
                line_number,
                file.display()
            ))
        })?;

        self.record_undo(NewUndo {
            kind: UndoKind::Edit,
            file_path: self.rel_path(file),
            line_number: line_number as i64,
            old_content: Some(old),
            new_content: Some(new.to_string()),
        })?;

        self.reindex_file(file)?;
        Ok(())
    }

    /// Delete a line from a journal file and resync it.
    pub fn delete_entry_line(&mut self, file: &Path, line_number: usize) -> Result<()> {
        let removed = fs::delete_line(file, line_number)?.ok_or_else(|| {
            Error::InvalidOperation(format!(
                "line {} out of range in {}",
                line_number,
                file.display()
            ))
        })?;

        self.record_undo(NewUndo {
            kind: UndoKind::Delete,
            file_path: self.rel_path(file),
            line_number: line_number as i64,
            old_content: Some(removed),
            new_content: None,
        })?;

        self.reindex_file(file)?;
        Ok(())
    }

    /// Reverse the most recent recorded mutation and resync its file.
    /// Returns the undone action, or `None` when history is empty.
    pub fn undo_last(&mut self) -> Result<Option<UndoRecord>> {
        let Some(action) = self.store.pop_undo()? else {
            return Ok(None);
        };

        let file = self.abs_path(&action.file_path);
        let line_number = action.line_number as usize;

        match action.kind {
            UndoKind::Add => {
                fs::delete_line(&file, line_number)?;
            }
            UndoKind::Edit => {
                let old = action.old_content.clone().unwrap_or_default();
                fs::update_line(&file, line_number, &old)?;
            }
            UndoKind::Delete => {
                let old = action.old_content.clone().unwrap_or_default();
                fs::insert_line(&file, line_number, &old)?;
            }
        }

        self.reindex_file(&file)?;
        Ok(Some(action))
    }

    fn record_undo(&self, action: NewUndo) -> Result<()> {
        self.store.push_undo(&action)?;
        self.store.trim_undo(UNDO_HISTORY_KEEP)?;
        Ok(())
    }

    fn rel_path(&self, path: &Path) -> String {
        resolve_context(path, &self.config.data_dir).file_path
    }

    fn abs_path(&self, rel: &str) -> PathBuf {
        let path = Path::new(rel);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.data_dir.join(rel)
        }
    }
}
