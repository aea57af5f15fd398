use rusqlite::{Connection, OptionalExtension, params};

use crate::{Result, records::FileHashRecord};

pub fn get(conn: &Connection, file_path: &str) -> Result<Option<String>> {
    let hash = conn
        .query_row(
            "SELECT content_hash FROM file_hashes WHERE file_path = ?1",
            [file_path],
            |row| row.get(0),
        )
        .optional()?;
    Ok(hash)
}

pub fn get_record(conn: &Connection, file_path: &str) -> Result<Option<FileHashRecord>> {
    let record = conn
        .query_row(
            "SELECT file_path, content_hash, indexed_at FROM file_hashes WHERE file_path = ?1",
            [file_path],
            |row| {
                Ok(FileHashRecord {
                    file_path: row.get(0)?,
                    content_hash: row.get(1)?,
                    indexed_at: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(record)
}

pub fn set(conn: &Connection, file_path: &str, content_hash: &str) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO file_hashes (file_path, content_hash, indexed_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(file_path) DO UPDATE SET
            content_hash = ?2,
            indexed_at = ?3
        "#,
        params![
            file_path,
            content_hash,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, file_path: &str) -> Result<()> {
    conn.execute("DELETE FROM file_hashes WHERE file_path = ?1", [file_path])?;
    Ok(())
}

pub fn list_paths(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT file_path FROM file_hashes ORDER BY file_path")?;
    let paths = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(paths)
}
