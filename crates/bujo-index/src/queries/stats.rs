use rusqlite::Connection;

use crate::{
    Result,
    records::{CollectionStats, JournalStats, MonthlyStats, StatusTotals},
};

/// Aggregate task statistics, optionally scoped to a year and/or month.
pub fn stats(conn: &Connection, year: Option<i32>, month: Option<u32>) -> Result<JournalStats> {
    let mut where_clauses = vec!["entry_type = 'task'".to_string()];
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(year) = year {
        where_clauses.push("strftime('%Y', entry_date) = ?".to_string());
        params.push(Box::new(format!("{:04}", year)));
    }
    if let Some(month) = month {
        where_clauses.push("strftime('%m', entry_date) = ?".to_string());
        params.push(Box::new(format!("{:02}", month)));
    }

    let where_clause = where_clauses.join(" AND ");
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

    let overall_sql = format!(
        r#"
        SELECT
            COUNT(*),
            SUM(CASE WHEN status = 'open' THEN 1 ELSE 0 END),
            SUM(CASE WHEN status = 'complete' THEN 1 ELSE 0 END),
            SUM(CASE WHEN status = 'migrated' THEN 1 ELSE 0 END),
            SUM(CASE WHEN status = 'scheduled' THEN 1 ELSE 0 END),
            SUM(CASE WHEN status = 'cancelled' THEN 1 ELSE 0 END)
        FROM entries
        WHERE {}
        "#,
        where_clause
    );

    let overall = conn.query_row(&overall_sql, param_refs.as_slice(), |row| {
        Ok(StatusTotals {
            total: row.get(0)?,
            open: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
            complete: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
            migrated: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
            scheduled: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
            cancelled: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
        })
    })?;

    // Monthly breakdown ignores the month filter; it exists to compare months
    let mut monthly_clauses = vec![
        "entry_type = 'task'".to_string(),
        "entry_date IS NOT NULL".to_string(),
    ];
    let mut monthly_params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
    if let Some(year) = year {
        monthly_clauses.push("strftime('%Y', entry_date) = ?".to_string());
        monthly_params.push(Box::new(format!("{:04}", year)));
    }

    let monthly_sql = format!(
        r#"
        SELECT
            strftime('%Y-%m', entry_date) AS month,
            COUNT(*),
            SUM(CASE WHEN status = 'complete' THEN 1 ELSE 0 END)
        FROM entries
        WHERE {}
        GROUP BY month
        ORDER BY month DESC
        "#,
        monthly_clauses.join(" AND ")
    );

    let monthly_refs: Vec<&dyn rusqlite::ToSql> =
        monthly_params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&monthly_sql)?;
    let monthly = stmt
        .query_map(monthly_refs.as_slice(), |row| {
            Ok(MonthlyStats {
                month: row.get(0)?,
                total: row.get(1)?,
                completed: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
            })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    let mut collection_clauses = vec![
        "entry_type = 'task'".to_string(),
        "collection IS NOT NULL".to_string(),
    ];
    let mut collection_params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
    if let Some(year) = year {
        collection_clauses.push("strftime('%Y', entry_date) = ?".to_string());
        collection_params.push(Box::new(format!("{:04}", year)));
    }

    let collections_sql = format!(
        r#"
        SELECT
            collection,
            COUNT(*),
            SUM(CASE WHEN status = 'complete' THEN 1 ELSE 0 END)
        FROM entries
        WHERE {}
        GROUP BY collection
        ORDER BY COUNT(*) DESC
        LIMIT 10
        "#,
        collection_clauses.join(" AND ")
    );

    let collection_refs: Vec<&dyn rusqlite::ToSql> =
        collection_params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&collections_sql)?;
    let collections = stmt
        .query_map(collection_refs.as_slice(), |row| {
            Ok(CollectionStats {
                collection: row.get(0)?,
                total: row.get(1)?,
                completed: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
            })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(JournalStats {
        overall,
        monthly,
        collections,
    })
}
