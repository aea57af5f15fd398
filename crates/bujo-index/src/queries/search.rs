use rusqlite::{Connection, params};

use crate::{
    Result,
    queries::entry::{ENTRY_COLUMNS, row_to_entry},
    records::SearchHit,
};

/// Full-text search over entry content, best matches first.
///
/// Snippets mark matched terms with `>>>`/`<<<`. The FTS index is maintained
/// by triggers, so results always reflect committed entry rows.
pub fn search(conn: &Connection, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let columns: String = ENTRY_COLUMNS
        .split(", ")
        .map(|c| format!("e.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        r#"
        SELECT {}, snippet(entries_fts, 0, '>>>', '<<<', '...', 32) AS snippet
        FROM entries e
        JOIN entries_fts ON e.id = entries_fts.rowid
        WHERE entries_fts MATCH ?1
        ORDER BY rank
        LIMIT ?2
        "#,
        columns
    );

    let mut stmt = conn.prepare(&sql)?;
    let hits = stmt
        .query_map(params![query, limit as i64], |row| {
            let entry = row_to_entry(row)?;
            let snippet: String = row.get(15)?;
            Ok(SearchHit { entry, snippet })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(hits)
}
