//! Project schema bootstrap.
//!
//! The script only uses `CREATE ... IF NOT EXISTS`, so running it on every
//! connection open is safe. There is no versioning: the schema either exists
//! in this exact shape or gets created.

use crate::db::DbResult;
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Tables owned by the projects store, parents first.
pub const PROJECT_TABLES: &[&str] = &[
    "project",
    "category",
    "material",
    "step",
    "project_category",
];

/// Creates any missing project table in one transaction.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.commit()?;
    Ok(())
}

/// Returns whether `table` exists in the main database.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
