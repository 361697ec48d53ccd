use journal_core::db::migrations::latest_version;
use journal_core::db::{open_db, open_db_in_memory, DbError};
use journal_core::{KvError, SqliteKeyValueStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv");
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
fn kv_store_rejects_uninitialized_connections() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteKeyValueStore::try_new(&conn);
    match result {
        Err(KvError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn kv_store_rejects_connections_without_the_kv_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteKeyValueStore::try_new(&conn);
    assert!(matches!(result, Err(KvError::MissingRequiredTable("kv"))));
}

#[test]
fn kv_put_is_an_upsert() {
    use journal_core::KeyValueStore;

    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();

    assert_eq!(store.get("k").unwrap(), None);
    store.put("k", "first").unwrap();
    store.put("k", "second").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
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
