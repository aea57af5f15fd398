use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use bujo_types::{FileContext, FileKind};

static DAILY_FILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})\.md$").unwrap());
static MONTHLY_FILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})\.md$").unwrap());

/// Derive a file's context from its path relative to the journal root.
///
/// Recognized layouts: `daily/YYYY-MM-DD.md`, `months/YYYY-MM.md`, root-level
/// `future.md` and `index.md`, and `collections/[<type>/]<name>.md`.
/// Anything else, including dated filenames that do not name a real calendar
/// date, resolves to `FileKind::Unknown` rather than being coerced into a
/// collection.
pub fn resolve_context(path: &Path, root: &Path) -> FileContext {
    let rel = path.strip_prefix(root).unwrap_or(path);
    // Normalize separators so stored paths match across platforms; a path
    // outside the root stays as-is
    let rel_str = if rel.is_absolute() {
        rel.to_string_lossy().to_string()
    } else {
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    };

    let file_name = rel
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = rel
        .file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let parts: Vec<&str> = rel_str.split('/').collect();

    if parts.first() == Some(&"daily") {
        if let Some(caps) = DAILY_FILE_PATTERN.captures(&file_name) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return FileContext {
                    kind: FileKind::Daily,
                    file_path: rel_str,
                    date: Some(date),
                    month: Some(format!("{:04}-{:02}", year, month)),
                    collection: None,
                    collection_type: None,
                };
            }
        }
        return FileContext::new(FileKind::Unknown, rel_str);
    }

    if parts.first() == Some(&"months") {
        if let Some(caps) = MONTHLY_FILE_PATTERN.captures(&file_name) {
            let month: u32 = caps[2].parse().unwrap_or(0);
            if (1..=12).contains(&month) {
                return FileContext {
                    kind: FileKind::Monthly,
                    file_path: rel_str.clone(),
                    date: None,
                    month: Some(format!("{}-{:02}", &caps[1], month)),
                    collection: None,
                    collection_type: None,
                };
            }
        }
        return FileContext::new(FileKind::Unknown, rel_str);
    }

    if rel_str == "future.md" {
        return FileContext::new(FileKind::Future, rel_str);
    }

    if rel_str == "index.md" {
        return FileContext::new(FileKind::Index, rel_str);
    }

    if parts.first() == Some(&"collections") {
        if parts.len() >= 3 {
            let collection_type = parts[1].to_string();
            return FileContext {
                kind: FileKind::Collection,
                file_path: rel_str.clone(),
                date: None,
                month: None,
                collection: Some(format!("{}/{}", collection_type, stem)),
                collection_type: Some(collection_type),
            };
        }
        if parts.len() == 2 {
            return FileContext {
                kind: FileKind::Collection,
                file_path: rel_str.clone(),
                date: None,
                month: None,
                collection: Some(stem),
                collection_type: None,
            };
        }
    }

    FileContext::new(FileKind::Unknown, rel_str)
}
