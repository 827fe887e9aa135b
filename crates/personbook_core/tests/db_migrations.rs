use personbook_core::db::migrations::latest_version;
use personbook_core::db::{close_db, open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "people");
}

#[test]
fn people_table_has_only_document_columns() {
    let conn = open_db_in_memory().unwrap();

    let mut stmt = conn.prepare("PRAGMA table_info(people);").unwrap();
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get("name"))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(columns, vec!["seq", "id", "name", "age", "favorite_foods"]);
}

#[test]
fn file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO people (id, name) VALUES ('00000000-0000-4000-8000-000000000001', 'Ada');",
        [],
    )
    .unwrap();
    close_db(conn).unwrap();

    let reopened = open_db(&path).unwrap();
    assert_eq!(schema_version(&reopened), latest_version());
    let count: i64 = reopened
        .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_rejects_empty_names_and_non_json_foods() {
    let conn = open_db_in_memory().unwrap();

    let empty = conn.execute(
        "INSERT INTO people (id, name) VALUES ('00000000-0000-4000-8000-000000000002', '');",
        [],
    );
    assert!(empty.is_err());

    let spaces = conn.execute(
        "INSERT INTO people (id, name) VALUES ('00000000-0000-4000-8000-000000000004', '  ');",
        [],
    );
    assert_eq!(spaces.unwrap(), 1);

    let bad_foods = conn.execute(
        "INSERT INTO people (id, name, favorite_foods)
         VALUES ('00000000-0000-4000-8000-000000000003', 'Ada', 'not json');",
        [],
    );
    assert!(bad_foods.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
