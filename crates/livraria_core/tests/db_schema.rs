use livraria_core::db::schema::{initialize, SCHEMA_VERSION};
use livraria_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_catalog_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_eq!(table_count(&conn, "livros"), 1);
    assert_eq!(
        column_names(&conn),
        vec!["id", "titulo", "autor", "ano_publicacao", "preco"]
    );
}

#[test]
fn repeated_initialize_keeps_one_table_and_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("livraria.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO livros (titulo, autor, ano_publicacao, preco) VALUES ('Dune', 'Herbert', 1965, 19.99);",
        [],
    )
    .unwrap();
    for _ in 0..5 {
        initialize(&conn).unwrap();
    }
    drop(conn);

    let reopened = open_db(&path).unwrap();
    assert_eq!(table_count(&reopened, "livros"), 1);
    let rows: i64 = reopened
        .query_row("SELECT COUNT(*) FROM livros;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn not_null_columns_reject_missing_fields() {
    let conn = open_db_in_memory().unwrap();

    let err = conn
        .execute(
            "INSERT INTO livros (titulo, autor, ano_publicacao, preco) VALUES ('Dune', NULL, 1965, 1.0);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("NOT NULL"));
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
        DbError::UnsupportedSchemaVersion { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn table_count(conn: &Connection, table_name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        [table_name],
        |row| row.get(0),
    )
    .unwrap()
}

fn column_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(livros);").unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}
