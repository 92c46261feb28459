use projects_core::db::schema::{table_exists, PROJECT_TABLES};
use projects_core::db::{open_db, open_db_in_memory};
use projects_core::{ConnectionProvider, SqliteConnectionProvider};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_every_project_table() {
    let conn = open_db_in_memory().unwrap();

    for table in PROJECT_TABLES {
        assert!(table_exists(&conn, table).unwrap(), "table {table} does not exist");
    }
}

#[test]
fn opened_connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();

    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let err = conn
        .execute(
            "INSERT INTO step (project_id, step_text, step_order) VALUES (1, 'orphan', 1);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

#[test]
fn reopening_the_same_file_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO category (category_name) VALUES ('Garden');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM category;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn provider_bootstraps_a_fresh_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.db");
    let provider = SqliteConnectionProvider::new(&path);
    assert_eq!(provider.path(), path.as_path());

    let conn = provider.connect().unwrap();
    assert!(table_exists(&conn, "project_category").unwrap());
    drop(conn);

    let raw = Connection::open(&path).unwrap();
    assert!(table_exists(&raw, "project").unwrap());
}
