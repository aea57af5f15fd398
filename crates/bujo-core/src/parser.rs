use once_cell::sync::Lazy;
use regex::Regex;

use bujo_types::{Entry, EntryType, Signifier, SignifierMap, TaskStatus};

static TASK_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([ x><~])\]\s+(.+)").unwrap());
static EVENT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^○\s*(.+)").unwrap());
static NOTE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\s+(.+)").unwrap());
static MIGRATION_TO_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*→(\S+)\s*$").unwrap());
static MIGRATION_FROM_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*←(\S+)\s*$").unwrap());

/// Parse a single line into an [`Entry`].
///
/// Returns `None` for anything that is not a recognized entry: blank lines,
/// `#` headers, plain prose, and bare signifiers with no marker after them.
/// Unrecognized lines are not errors.
pub fn parse_line(line: &str, line_number: usize, signifiers: &SignifierMap) -> Option<Entry> {
    let raw_line = line.to_string();
    let mut rest = line.trim();

    if rest.is_empty() || rest.starts_with('#') {
        return None;
    }

    // Signifier prefix: one configured character immediately followed by
    // whitespace
    let mut signifier = None;
    if let Some(first) = rest.chars().next()
        && let Some(sig) = signifiers.signifier_for(first)
    {
        let after = &rest[first.len_utf8()..];
        if after.starts_with(|c: char| c.is_whitespace()) {
            signifier = Some(sig);
            rest = after.trim_start();
        }
    }

    // Migration hints are suffixes; strip →destination first, then ←source
    // from the remainder
    let mut migrated_to = None;
    let mut migrated_from = None;
    let mut text = rest.to_string();

    let to_hit = MIGRATION_TO_PATTERN
        .captures(&text)
        .map(|caps| (caps.get(0).unwrap().start(), caps[1].to_string()));
    if let Some((start, token)) = to_hit {
        migrated_to = Some(token);
        text.truncate(start);
        text.truncate(text.trim_end().len());
    }

    let from_hit = MIGRATION_FROM_PATTERN
        .captures(&text)
        .map(|caps| (caps.get(0).unwrap().start(), caps[1].to_string()));
    if let Some((start, token)) = from_hit {
        migrated_from = Some(token);
        text.truncate(start);
        text.truncate(text.trim_end().len());
    }

    if let Some(caps) = TASK_PATTERN.captures(&text) {
        let status_char = caps[1].chars().next().unwrap();
        let status = TaskStatus::from_marker_char(status_char).unwrap_or(TaskStatus::Open);
        return Some(Entry {
            entry_type: EntryType::Task,
            content: caps[2].trim().to_string(),
            raw_line,
            line_number,
            status: Some(status),
            signifier,
            migrated_to,
            migrated_from,
        });
    }

    if let Some(caps) = EVENT_PATTERN.captures(&text) {
        return Some(Entry {
            entry_type: EntryType::Event,
            content: caps[1].trim().to_string(),
            raw_line,
            line_number,
            status: None,
            signifier,
            migrated_to,
            migrated_from,
        });
    }

    if let Some(caps) = NOTE_PATTERN.captures(&text) {
        return Some(Entry {
            entry_type: EntryType::Note,
            content: caps[1].trim().to_string(),
            raw_line,
            line_number,
            status: None,
            signifier,
            migrated_to,
            migrated_from,
        });
    }

    None
}

/// Parse every recognizable entry out of a file's content.
///
/// Line numbers are 1-based. The caller owns file I/O; this stays pure.
pub fn parse_lines(content: &str, signifiers: &SignifierMap) -> Vec<Entry> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| parse_line(line, i + 1, signifiers))
        .collect()
}

/// Rewrite the status character of a task line in place, preserving
/// everything else (signifier, content, migration hints, whitespace).
pub fn update_task_status(line: &str, new_status: TaskStatus) -> String {
    static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([ x><~])\]").unwrap());

    match MARKER.find(line) {
        Some(m) => {
            let mut result = String::with_capacity(line.len());
            result.push_str(&line[..m.start() + 1]);
            result.push(new_status.marker_char());
            result.push_str(&line[m.end() - 1..]);
            result
        }
        None => line.to_string(),
    }
}

/// Append a `→destination` hint to a line, replacing any existing one.
pub fn add_migration_hint(line: &str, destination: &str) -> String {
    let stripped = MIGRATION_TO_PATTERN.replace(line.trim_end(), "");
    format!("{} →{}", stripped.trim_end(), destination)
}

/// Render a fresh open task carrying a `←source` hint, used when a task is
/// migrated into another file.
pub fn create_migrated_entry(
    content: &str,
    source: &str,
    signifier: Option<Signifier>,
    signifiers: &SignifierMap,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(sig) = signifier
        && let Some(c) = signifiers.char_for(sig)
    {
        parts.push(c.to_string());
    }

    parts.push("[ ]".to_string());
    parts.push(content.to_string());
    parts.push(format!("←{}", source));

    parts.join(" ")
}
