use serde::{Deserialize, Serialize};

use crate::signifier::SignifierMap;

/// Kind of bullet journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Task,
    Event,
    Note,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Task => "task",
            EntryType::Event => "event",
            EntryType::Note => "note",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "task" => Some(EntryType::Task),
            "event" => Some(EntryType::Event),
            "note" => Some(EntryType::Note),
            _ => None,
        }
    }
}

/// Status of a task entry, encoded as the character inside its bracket marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Complete,
    Migrated,
    Scheduled,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Complete => "complete",
            TaskStatus::Migrated => "migrated",
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(TaskStatus::Open),
            "complete" => Some(TaskStatus::Complete),
            "migrated" => Some(TaskStatus::Migrated),
            "scheduled" => Some(TaskStatus::Scheduled),
            "cancelled" => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }

    /// Character between the brackets of a task marker (`[x]`, `[>]`, ...).
    pub fn marker_char(&self) -> char {
        match self {
            TaskStatus::Open => ' ',
            TaskStatus::Complete => 'x',
            TaskStatus::Migrated => '>',
            TaskStatus::Scheduled => '<',
            TaskStatus::Cancelled => '~',
        }
    }

    pub fn from_marker_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(TaskStatus::Open),
            'x' => Some(TaskStatus::Complete),
            '>' => Some(TaskStatus::Migrated),
            '<' => Some(TaskStatus::Scheduled),
            '~' => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }
}

/// Entry signifier (the single-character prefix ahead of the marker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signifier {
    Priority,
    Inspiration,
    Explore,
    Waiting,
    Delegated,
}

impl Signifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signifier::Priority => "priority",
            Signifier::Inspiration => "inspiration",
            Signifier::Explore => "explore",
            Signifier::Waiting => "waiting",
            Signifier::Delegated => "delegated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "priority" => Some(Signifier::Priority),
            "inspiration" => Some(Signifier::Inspiration),
            "explore" => Some(Signifier::Explore),
            "waiting" => Some(Signifier::Waiting),
            "delegated" => Some(Signifier::Delegated),
            _ => None,
        }
    }
}

/// A parsed bullet journal entry.
///
/// Produced by the line parser; positional provenance (`raw_line`,
/// `line_number`) points back into the source file. Entries are ephemeral
/// until the indexer persists them as records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub entry_type: EntryType,
    pub content: String,
    pub raw_line: String,
    pub line_number: usize,
    /// Set for tasks only.
    pub status: Option<TaskStatus>,
    pub signifier: Option<Signifier>,
    pub migrated_to: Option<String>,
    pub migrated_from: Option<String>,
}

impl Entry {
    /// Render the entry back to its markdown line form.
    ///
    /// Inverse of parsing modulo exact whitespace: signifier char, type/status
    /// marker, content and migration hints, space-joined.
    pub fn to_markdown(&self, signifiers: &SignifierMap) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(sig) = self.signifier
            && let Some(c) = signifiers.char_for(sig)
        {
            parts.push(c.to_string());
        }

        match self.entry_type {
            EntryType::Task => {
                let status = self.status.unwrap_or(TaskStatus::Open);
                parts.push(format!("[{}]", status.marker_char()));
            }
            EntryType::Event => parts.push("○".to_string()),
            EntryType::Note => parts.push("-".to_string()),
        }

        parts.push(self.content.clone());

        if let Some(dest) = &self.migrated_to {
            parts.push(format!("→{}", dest));
        }
        if let Some(src) = &self.migrated_from {
            parts.push(format!("←{}", src));
        }

        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_marker_round_trip() {
        for status in [
            TaskStatus::Open,
            TaskStatus::Complete,
            TaskStatus::Migrated,
            TaskStatus::Scheduled,
            TaskStatus::Cancelled,
        ] {
            assert_eq!(TaskStatus::from_marker_char(status.marker_char()), Some(status));
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_entry_type_parse_rejects_unknown() {
        assert_eq!(EntryType::parse("habit"), None);
    }

    #[test]
    fn test_to_markdown_task_with_hints() {
        let entry = Entry {
            entry_type: EntryType::Task,
            content: "Call the bank".to_string(),
            raw_line: String::new(),
            line_number: 0,
            status: Some(TaskStatus::Migrated),
            signifier: Some(Signifier::Priority),
            migrated_to: Some("2024-12".to_string()),
            migrated_from: None,
        };

        let line = entry.to_markdown(&SignifierMap::default());
        assert_eq!(line, "* [>] Call the bank →2024-12");
    }

    #[test]
    fn test_to_markdown_note_without_signifier() {
        let entry = Entry {
            entry_type: EntryType::Note,
            content: "Rainy all day".to_string(),
            raw_line: String::new(),
            line_number: 0,
            status: None,
            signifier: None,
            migrated_to: None,
            migrated_from: None,
        };

        assert_eq!(entry.to_markdown(&SignifierMap::default()), "- Rainy all day");
    }
}
