use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    Result,
    records::{NewUndo, UndoRecord},
};

pub fn push(conn: &Connection, action: &NewUndo) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO undo_history (kind, file_path, line_number, old_content, new_content, timestamp)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            action.kind.as_str(),
            &action.file_path,
            action.line_number,
            &action.old_content,
            &action.new_content,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn peek(conn: &Connection) -> Result<Option<UndoRecord>> {
    let record = conn
        .query_row(
            r#"
            SELECT id, kind, file_path, line_number, old_content, new_content, timestamp
            FROM undo_history
            ORDER BY id DESC
            LIMIT 1
            "#,
            [],
            row_to_undo,
        )
        .optional()?;
    Ok(record)
}

/// Remove and return the most recent recorded mutation.
pub fn pop(conn: &Connection) -> Result<Option<UndoRecord>> {
    let record = peek(conn)?;
    if let Some(record) = &record {
        conn.execute("DELETE FROM undo_history WHERE id = ?1", [record.id])?;
    }
    Ok(record)
}

/// Keep only the most recent `keep` actions.
pub fn trim(conn: &Connection, keep: usize) -> Result<()> {
    conn.execute(
        r#"
        DELETE FROM undo_history
        WHERE id NOT IN (
            SELECT id FROM undo_history ORDER BY id DESC LIMIT ?1
        )
        "#,
        [keep as i64],
    )?;
    Ok(())
}

fn row_to_undo(row: &rusqlite::Row) -> rusqlite::Result<UndoRecord> {
    let kind_str: String = row.get(1)?;
    let kind = crate::records::UndoKind::parse(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unrecognized undo kind '{}'", kind_str).into(),
        )
    })?;

    Ok(UndoRecord {
        id: row.get(0)?,
        kind,
        file_path: row.get(2)?,
        line_number: row.get(3)?,
        old_content: row.get(4)?,
        new_content: row.get(5)?,
        timestamp: row.get(6)?,
    })
}
