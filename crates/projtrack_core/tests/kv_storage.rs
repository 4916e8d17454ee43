use projtrack_core::db::migrations::latest_version;
use projtrack_core::db::{open_db, open_db_in_memory, DbError};
use projtrack_core::{
    KvRepository, LoadOutcome, Project, ProjectStore, RepoError, SqliteKvRepository, StoreConfig,
    DEFAULT_STORAGE_KEY,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projtrack.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv_entries");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("kv.sqlite3");

    let repo = SqliteKvRepository::open(&path).unwrap();
    repo.set_item("k", "v").unwrap();
    assert!(path.exists());
}

#[test]
fn open_db_reports_uncreatable_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();

    match open_db(blocker.join("kv.sqlite3")).unwrap_err() {
        DbError::CreateDir { path, .. } => assert_eq!(path, blocker),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteKvRepository::try_new(conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_kv_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteKvRepository::try_new(conn),
        Err(RepoError::MissingRequiredTable("kv_entries"))
    ));
}

#[test]
fn repository_rejects_kv_table_missing_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE kv_entries (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteKvRepository::try_new(conn),
        Err(RepoError::MissingRequiredColumn {
            table: "kv_entries",
            column: "updated_at"
        })
    ));
}

#[test]
fn store_state_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.sqlite3");

    let created_ids = {
        let repo = SqliteKvRepository::open(&path).unwrap();
        let (mut store, outcome) = ProjectStore::open(repo, StoreConfig::default()).unwrap();
        assert_eq!(outcome, LoadOutcome::Empty);

        let a = store.create(Project::new("A")).unwrap();
        let b = store
            .create(Project::new("B").with_status("Maintenance"))
            .unwrap();
        store.create(Project::new("C")).unwrap();
        store.delete(2).unwrap();
        vec![a, b]
    };

    let repo = SqliteKvRepository::open(&path).unwrap();
    let (store, outcome) = ProjectStore::open(repo, StoreConfig::default()).unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded { count: 2 });
    assert_eq!(
        store.projects().map(|project| project.id).collect::<Vec<_>>(),
        created_ids
    );
    assert_eq!(
        store.get(1).and_then(|project| project.status.as_deref()),
        Some("Maintenance")
    );
}

#[test]
fn store_keeps_one_row_per_key() {
    let repo = SqliteKvRepository::open_in_memory().unwrap();
    let mut store = ProjectStore::new(repo);
    for title in ["A", "B", "C"] {
        store.create(Project::new(title)).unwrap();
    }

    let rows: i64 = store
        .repository()
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM kv_entries WHERE key = ?1;",
            [DEFAULT_STORAGE_KEY],
            |row| row.get(0),
        )
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
