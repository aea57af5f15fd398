use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bujo_core::{entry_ref, hash_bytes, parse_lines, resolve_context};
use bujo_index::{NewEntry, Store, StoreTx};
use bujo_types::{Entry, EntryRef, FileContext, SignifierMap};

use crate::config::Config;
use crate::storage::fs::walk_markdown_files;
use crate::{Error, Result};

/// Salted ref regeneration attempts before a file's indexing fails loudly.
const MAX_REF_ATTEMPTS: usize = 16;

#[derive(Debug, Clone)]
pub enum IndexProgress {
    Scanning {
        root: PathBuf,
    },
    FileIndexed {
        path: String,
        entries: usize,
    },
    FileRemoved {
        path: String,
    },
    FileFailed {
        path: String,
        message: String,
    },
    Completed {
        indexed: usize,
        removed: usize,
        skipped: usize,
    },
}

/// A file whose indexing failed; the rest of the run continued without it.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: String,
    pub message: String,
}

/// Outcome of a full or incremental run.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    /// Files whose entries were (re)written.
    pub indexed: usize,
    /// Previously indexed files no longer on disk.
    pub removed: usize,
    /// Files skipped because their content hash was unchanged.
    pub skipped: usize,
    pub failures: Vec<FileFailure>,
}

impl IndexReport {
    /// Changed-file count: reindexed plus removed.
    pub fn changed(&self) -> usize {
        self.indexed + self.removed
    }
}

/// Keeps the store synchronized with the markdown tree.
///
/// Stateless between calls: every operation re-derives what it needs from
/// disk and the store. One file's clear+reinsert+hash update commits as a
/// single transaction, so the stored hash can never get ahead of the stored
/// entries; a crash leaves the hash stale and the next incremental run redoes
/// the file.
pub struct Indexer<'a> {
    data_dir: PathBuf,
    signifiers: SignifierMap,
    store: &'a mut Store,
}

impl<'a> Indexer<'a> {
    pub fn new(config: &Config, store: &'a mut Store) -> Result<Self> {
        Ok(Self::with_signifiers(
            config.data_dir.clone(),
            config.signifier_map()?,
            store,
        ))
    }

    pub fn with_signifiers(
        data_dir: PathBuf,
        signifiers: SignifierMap,
        store: &'a mut Store,
    ) -> Self {
        Self {
            data_dir,
            signifiers,
            store,
        }
    }

    /// Rebuild the store from scratch. Used on first run or when the cache is
    /// suspect. Idempotent: two back-to-back runs produce an identical store.
    pub fn full_reindex<F>(&mut self, mut on_progress: F) -> Result<IndexReport>
    where
        F: FnMut(IndexProgress),
    {
        self.store.clear_all()?;
        on_progress(IndexProgress::Scanning {
            root: self.data_dir.clone(),
        });

        let mut report = IndexReport::default();

        for path in walk_markdown_files(&self.data_dir) {
            let context = resolve_context(&path, &self.data_dir);
            match self.index_file(&path, &context) {
                Ok(entries) => {
                    report.indexed += 1;
                    on_progress(IndexProgress::FileIndexed {
                        path: context.file_path,
                        entries,
                    });
                }
                Err(err) => {
                    let message = err.to_string();
                    on_progress(IndexProgress::FileFailed {
                        path: context.file_path.clone(),
                        message: message.clone(),
                    });
                    report.failures.push(FileFailure {
                        path: context.file_path,
                        message,
                    });
                }
            }
        }

        on_progress(IndexProgress::Completed {
            indexed: report.indexed,
            removed: report.removed,
            skipped: report.skipped,
        });

        Ok(report)
    }

    /// Reindex only files whose content hash differs from the stored one, and
    /// drop records of files that disappeared. Untouched files keep their
    /// records and refs byte-for-byte.
    pub fn incremental_reindex<F>(&mut self, mut on_progress: F) -> Result<IndexReport>
    where
        F: FnMut(IndexProgress),
    {
        let mut report = IndexReport::default();

        if !self.data_dir.exists() {
            return Ok(report);
        }

        on_progress(IndexProgress::Scanning {
            root: self.data_dir.clone(),
        });

        let indexed_files: HashSet<String> = self.store.list_indexed_files()?.into_iter().collect();
        let mut current_files: HashSet<String> = HashSet::new();

        for path in walk_markdown_files(&self.data_dir) {
            let context = resolve_context(&path, &self.data_dir);
            current_files.insert(context.file_path.clone());

            let result = (|| -> Result<Option<usize>> {
                let content = std::fs::read_to_string(&path)?;
                let content_hash = hash_bytes(content.as_bytes());
                let stored_hash = self.store.get_file_hash(&context.file_path)?;

                if stored_hash.as_deref() == Some(content_hash.as_str()) {
                    return Ok(None);
                }

                let count = self.index_content(&context, &content, &content_hash)?;
                Ok(Some(count))
            })();

            match result {
                Ok(Some(entries)) => {
                    report.indexed += 1;
                    on_progress(IndexProgress::FileIndexed {
                        path: context.file_path,
                        entries,
                    });
                }
                Ok(None) => report.skipped += 1,
                Err(err) => {
                    let message = err.to_string();
                    on_progress(IndexProgress::FileFailed {
                        path: context.file_path.clone(),
                        message: message.clone(),
                    });
                    report.failures.push(FileFailure {
                        path: context.file_path,
                        message,
                    });
                }
            }
        }

        // Files indexed before but gone from disk
        let mut deleted: Vec<&String> = indexed_files.difference(&current_files).collect();
        deleted.sort();
        for file_path in deleted {
            let tx = self.store.begin()?;
            tx.clear_file(file_path)?;
            tx.delete_file_hash(file_path)?;
            tx.commit()?;

            report.removed += 1;
            on_progress(IndexProgress::FileRemoved {
                path: file_path.clone(),
            });
        }

        on_progress(IndexProgress::Completed {
            indexed: report.indexed,
            removed: report.removed,
            skipped: report.skipped,
        });

        Ok(report)
    }

    /// Resynchronize a single file after an external mutation. A missing file
    /// is a deletion signal, not an error.
    pub fn reindex_file(&mut self, path: &Path) -> Result<()> {
        let context = resolve_context(path, &self.data_dir);

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let content_hash = hash_bytes(content.as_bytes());
            self.index_content(&context, &content, &content_hash)?;
        } else {
            let tx = self.store.begin()?;
            tx.clear_file(&context.file_path)?;
            tx.delete_file_hash(&context.file_path)?;
            tx.commit()?;
        }

        Ok(())
    }

    fn index_file(&mut self, path: &Path, context: &FileContext) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        let content_hash = hash_bytes(content.as_bytes());
        self.index_content(context, &content, &content_hash)
    }

    /// Replace one file's records in a single transaction: clear, reinsert
    /// every parsed entry, then record the hash of exactly the bytes that
    /// were parsed.
    fn index_content(
        &mut self,
        context: &FileContext,
        content: &str,
        content_hash: &str,
    ) -> Result<usize> {
        let entries = parse_lines(content, &self.signifiers);
        let date_key = context.date.map(|d| d.to_string()).unwrap_or_default();

        let tx = self.store.begin()?;
        tx.clear_file(&context.file_path)?;

        for entry in &entries {
            let entry_ref = allocate_ref(&tx, &context.file_path, entry, &date_key)?;
            tx.insert_entry(&NewEntry {
                entry_ref,
                source_file: context.file_path.clone(),
                line_number: entry.line_number as i64,
                raw_line: entry.raw_line.clone(),
                entry_type: entry.entry_type,
                status: entry.status,
                signifier: entry.signifier,
                content: entry.content.clone(),
                entry_date: context.date,
                collection: context.collection.clone(),
                month: context.month.clone(),
                migrated_to: entry.migrated_to.clone(),
                migrated_from: entry.migrated_from.clone(),
            })?;
        }

        tx.set_file_hash(&context.file_path, content_hash)?;
        tx.commit()?;

        Ok(entries.len())
    }
}

/// Pick a ref that is free in the store (including rows inserted earlier in
/// the same transaction). Colliding refs are regenerated deterministically:
/// first with the line number appended to the context key, then with an
/// increasing counter.
fn allocate_ref(
    tx: &StoreTx<'_>,
    source_file: &str,
    entry: &Entry,
    date_key: &str,
) -> Result<EntryRef> {
    let candidate = entry_ref(source_file, &entry.content, date_key);
    if !tx.entry_ref_exists(&candidate)? {
        return Ok(candidate);
    }

    for attempt in 0..MAX_REF_ATTEMPTS {
        let salted_key = if attempt == 0 {
            format!("{}:{}", date_key, entry.line_number)
        } else {
            format!("{}:{}:{}", date_key, entry.line_number, attempt)
        };
        let candidate = entry_ref(source_file, &entry.content, &salted_key);
        if !tx.entry_ref_exists(&candidate)? {
            return Ok(candidate);
        }
    }

    Err(Error::InvalidOperation(format!(
        "could not allocate a unique ref for {}:{}",
        source_file, entry.line_number
    )))
}
