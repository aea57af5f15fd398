use bujo_types::{EntryRef, EntryType, Signifier, TaskStatus};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};

use crate::{
    Error, Result,
    records::{EntryRecord, NewEntry, TaskFilter},
};

pub(crate) const ENTRY_COLUMNS: &str = "id, entry_ref, source_file, line_number, raw_line, \
     entry_type, status, signifier, content, entry_date, collection, month, \
     migrated_to, migrated_from, created_at";

pub fn insert(conn: &Connection, entry: &NewEntry) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO entries
        (entry_ref, source_file, line_number, raw_line, entry_type,
         status, signifier, content, entry_date, collection, month,
         migrated_to, migrated_from)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
        params![
            entry.entry_ref.as_str(),
            &entry.source_file,
            entry.line_number,
            &entry.raw_line,
            entry.entry_type.as_str(),
            entry.status.map(|s| s.as_str()),
            entry.signifier.map(|s| s.as_str()),
            &entry.content,
            entry.entry_date.map(|d| d.to_string()),
            &entry.collection,
            &entry.month,
            &entry.migrated_to,
            &entry.migrated_from,
        ],
    )?;

    Ok(())
}

pub fn clear_all(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM entries", [])?;
    conn.execute("DELETE FROM file_hashes", [])?;
    Ok(())
}

pub fn clear_file(conn: &Connection, source_file: &str) -> Result<()> {
    conn.execute("DELETE FROM entries WHERE source_file = ?1", [source_file])?;
    Ok(())
}

pub fn ref_exists(conn: &Connection, entry_ref: &EntryRef) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM entries WHERE entry_ref = ?1",
        [entry_ref.as_str()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get_by_ref(conn: &Connection, entry_ref: &EntryRef) -> Result<Option<EntryRecord>> {
    let query = format!("SELECT {} FROM entries WHERE entry_ref = ?1", ENTRY_COLUMNS);
    let mut stmt = conn.prepare(&query)?;

    let mut rows = stmt.query([entry_ref.as_str()])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_entry(row)?)),
        None => Ok(None),
    }
}

/// Find an entry by ref prefix (supports short refs typed by users).
///
/// Returns `None` when nothing matches; an ambiguous prefix is an error.
pub fn get_by_ref_prefix(conn: &Connection, prefix: &str) -> Result<Option<EntryRecord>> {
    let query = format!(
        "SELECT {} FROM entries WHERE entry_ref LIKE ?1 LIMIT 2",
        ENTRY_COLUMNS
    );
    let mut stmt = conn.prepare(&query)?;

    let pattern = format!("{}%", prefix);
    let mut matches = stmt
        .query_map([&pattern], row_to_entry)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches.remove(0))),
        _ => Err(Error::Query(format!(
            "Ambiguous entry ref prefix '{}': multiple entries match",
            prefix
        ))),
    }
}

pub fn by_date(conn: &Connection, date: NaiveDate) -> Result<Vec<EntryRecord>> {
    let query = format!(
        "SELECT {} FROM entries WHERE entry_date = ?1 ORDER BY line_number",
        ENTRY_COLUMNS
    );
    collect(conn, &query, [date.to_string()])
}

pub fn by_file(conn: &Connection, source_file: &str) -> Result<Vec<EntryRecord>> {
    let query = format!(
        "SELECT {} FROM entries WHERE source_file = ?1 ORDER BY line_number",
        ENTRY_COLUMNS
    );
    collect(conn, &query, [source_file])
}

pub fn by_month(conn: &Connection, month: &str) -> Result<Vec<EntryRecord>> {
    let query = format!(
        "SELECT {} FROM entries WHERE month = ?1 ORDER BY entry_date, line_number",
        ENTRY_COLUMNS
    );
    collect(conn, &query, [month])
}

pub fn by_collection(conn: &Connection, collection: &str) -> Result<Vec<EntryRecord>> {
    let query = format!(
        "SELECT {} FROM entries WHERE collection = ?1 ORDER BY line_number",
        ENTRY_COLUMNS
    );
    collect(conn, &query, [collection])
}

pub fn tasks(conn: &Connection, filter: &TaskFilter) -> Result<Vec<EntryRecord>> {
    let mut where_clauses = vec!["entry_type = 'task'".to_string()];
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(status) = filter.status {
        where_clauses.push("status = ?".to_string());
        params.push(Box::new(status.as_str().to_string()));
    }
    if let Some(from) = filter.from_date {
        where_clauses.push("entry_date >= ?".to_string());
        params.push(Box::new(from.to_string()));
    }
    if let Some(to) = filter.to_date {
        where_clauses.push("entry_date <= ?".to_string());
        params.push(Box::new(to.to_string()));
    }
    if let Some(collection) = &filter.collection {
        where_clauses.push("collection = ?".to_string());
        params.push(Box::new(collection.clone()));
    }
    if let Some(signifier) = filter.signifier {
        where_clauses.push("signifier = ?".to_string());
        params.push(Box::new(signifier.as_str().to_string()));
    }

    let query = format!(
        "SELECT {} FROM entries WHERE {} ORDER BY entry_date DESC, line_number",
        ENTRY_COLUMNS,
        where_clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&query)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let entries = stmt
        .query_map(param_refs.as_slice(), row_to_entry)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(entries)
}

fn collect<P: rusqlite::Params>(
    conn: &Connection,
    query: &str,
    params: P,
) -> Result<Vec<EntryRecord>> {
    let mut stmt = conn.prepare(query)?;
    let entries = stmt
        .query_map(params, row_to_entry)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(entries)
}

pub(crate) fn row_to_entry(row: &Row) -> rusqlite::Result<EntryRecord> {
    let type_str: String = row.get(5)?;
    let entry_type =
        EntryType::parse(&type_str).ok_or_else(|| conversion_failure(5, &type_str))?;

    let status = row
        .get::<_, Option<String>>(6)?
        .map(|s| TaskStatus::parse(&s).ok_or_else(|| conversion_failure(6, &s)))
        .transpose()?;

    let signifier = row
        .get::<_, Option<String>>(7)?
        .map(|s| Signifier::parse(&s).ok_or_else(|| conversion_failure(7, &s)))
        .transpose()?;

    let entry_date = row
        .get::<_, Option<String>>(9)?
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| conversion_failure(9, &s))
        })
        .transpose()?;

    Ok(EntryRecord {
        id: row.get(0)?,
        entry_ref: EntryRef::new(row.get::<_, String>(1)?),
        source_file: row.get(2)?,
        line_number: row.get(3)?,
        raw_line: row.get(4)?,
        entry_type,
        status,
        signifier,
        content: row.get(8)?,
        entry_date,
        collection: row.get(10)?,
        month: row.get(11)?,
        migrated_to: row.get(12)?,
        migrated_from: row.get(13)?,
        created_at: row.get(14)?,
    })
}

fn conversion_failure(idx: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("unrecognized value '{}'", value).into(),
    )
}
