use chrono::{Datelike, NaiveDate};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Create the standard journal directory layout.
pub fn ensure_journal_dirs(data_dir: &Path, collection_types: &[String]) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    std::fs::create_dir_all(data_dir.join("daily"))?;
    std::fs::create_dir_all(data_dir.join("months"))?;

    let collections = data_dir.join("collections");
    std::fs::create_dir_all(&collections)?;
    for collection_type in collection_types {
        std::fs::create_dir_all(collections.join(collection_type))?;
    }

    Ok(())
}

pub fn daily_file(data_dir: &Path, day: NaiveDate) -> PathBuf {
    data_dir.join("daily").join(format!("{}.md", day))
}

pub fn monthly_file(data_dir: &Path, year: i32, month: u32) -> PathBuf {
    data_dir
        .join("months")
        .join(format!("{:04}-{:02}.md", year, month))
}

pub fn future_file(data_dir: &Path) -> PathBuf {
    data_dir.join("future.md")
}

pub fn index_file(data_dir: &Path) -> PathBuf {
    data_dir.join("index.md")
}

pub fn collection_file(data_dir: &Path, name: &str, collection_type: Option<&str>) -> PathBuf {
    let collections = data_dir.join("collections");
    if let Some(collection_type) = collection_type {
        return collections
            .join(collection_type)
            .join(format!("{}.md", name));
    }
    // A name of the form type/name carries its own namespace
    if let Some((collection_type, name)) = name.split_once('/') {
        return collections
            .join(collection_type)
            .join(format!("{}.md", name));
    }
    collections.join(format!("{}.md", name))
}

/// All markdown files under the data directory, sorted for deterministic
/// indexing order.
pub fn walk_markdown_files(data_dir: &Path) -> Vec<PathBuf> {
    if !data_dir.exists() {
        return Vec::new();
    }

    WalkDir::new(data_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "md"))
        .map(|entry| entry.into_path())
        .collect()
}

/// Read a file as lines without trailing newlines; missing file reads empty.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(|l| l.to_string()).collect())
}

/// Write lines to a file, newline-terminated, creating parent directories.
pub fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(path, content)
}

/// Replace a 1-based line. Returns the previous content, or `None` when the
/// line number is out of range (the file is left untouched).
pub fn update_line(path: &Path, line_number: usize, new_content: &str) -> io::Result<Option<String>> {
    let mut lines = read_lines(path)?;

    if line_number < 1 || line_number > lines.len() {
        return Ok(None);
    }

    let idx = line_number - 1;
    let old_content = std::mem::replace(&mut lines[idx], new_content.trim_end_matches('\n').to_string());
    write_lines(path, &lines)?;
    Ok(Some(old_content))
}

/// Append a line to a file. Returns the new 1-based line number.
pub fn append_line(path: &Path, content: &str) -> io::Result<usize> {
    let mut lines = read_lines(path)?;
    lines.push(content.trim_end_matches('\n').to_string());
    write_lines(path, &lines)?;
    Ok(lines.len())
}

/// Insert a line at a 1-based position, clamped to the file bounds.
pub fn insert_line(path: &Path, line_number: usize, content: &str) -> io::Result<()> {
    let mut lines = read_lines(path)?;

    let idx = line_number.clamp(1, lines.len() + 1) - 1;
    lines.insert(idx, content.trim_end_matches('\n').to_string());
    write_lines(path, &lines)
}

/// Delete a 1-based line. Returns the removed content, or `None` when out of
/// range.
pub fn delete_line(path: &Path, line_number: usize) -> io::Result<Option<String>> {
    let mut lines = read_lines(path)?;

    if line_number < 1 || line_number > lines.len() {
        return Ok(None);
    }

    let removed = lines.remove(line_number - 1);
    write_lines(path, &lines)?;
    Ok(Some(removed))
}

/// Create a daily log with its date header if it does not exist yet.
pub fn create_daily_file(data_dir: &Path, day: NaiveDate) -> io::Result<PathBuf> {
    let path = daily_file(data_dir, day);
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let header = format!("# {}\n\n", day.format("%B %d, %Y"));
        std::fs::write(&path, header)?;
    }
    Ok(path)
}

/// Create a monthly log with a calendar listing and Tasks section if it does
/// not exist yet.
pub fn create_monthly_file(data_dir: &Path, year: i32, month: u32) -> io::Result<PathBuf> {
    let path = monthly_file(data_dir, year, month);
    if path.exists() {
        return Ok(path);
    }

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid month {:04}-{:02}", year, month),
        )
    })?;

    let day_abbrs = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
    let mut lines = vec![
        format!("# {}", first.format("%B %Y")),
        String::new(),
        "## Calendar".to_string(),
        String::new(),
    ];

    let mut day = first;
    while day.month() == month {
        let abbr = day_abbrs[day.weekday().num_days_from_monday() as usize];
        lines.push(format!("{:02} {}", day.day(), abbr));
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    lines.extend([String::new(), "## Tasks".to_string(), String::new()]);

    write_lines(&path, &lines)?;
    Ok(path)
}

/// Create the future log if it does not exist yet.
pub fn create_future_file(data_dir: &Path) -> io::Result<PathBuf> {
    let path = future_file(data_dir);
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, "# Future Log\n\n## Someday\n\n")?;
    }
    Ok(path)
}

/// Create a collection file with a per-type section template if it does not
/// exist yet.
pub fn create_collection_file(
    data_dir: &Path,
    name: &str,
    collection_type: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> io::Result<PathBuf> {
    let path = collection_file(data_dir, name, Some(collection_type));
    if path.exists() {
        return Ok(path);
    }

    let display_title = match title {
        Some(title) => title.to_string(),
        None => name
            .split(['-', '_'])
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    };

    let mut lines = vec![format!("# {}", display_title), String::new()];

    if let Some(description) = description {
        lines.push(format!("> {}", description));
        lines.push(String::new());
    }

    match collection_type {
        "projects" => lines.extend([
            "## Goals".to_string(),
            String::new(),
            "## Tasks".to_string(),
            String::new(),
            "## Notes".to_string(),
            String::new(),
        ]),
        "trackers" => lines.extend(["## Log".to_string(), String::new()]),
        _ => {}
    }

    write_lines(&path, &lines)?;
    Ok(path)
}
