use livraria_core::db::open_db_in_memory;
use livraria_core::db::schema::SCHEMA_VERSION;
use livraria_core::{
    BookRepository, BookValidationError, NewBook, RepoError, SqliteBookRepository,
};
use rusqlite::Connection;

fn dune() -> NewBook {
    NewBook::new("Dune", "Herbert", 1965, 19.99)
}

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let id = repo.insert_book(&dune()).unwrap();
    let loaded = repo.get_book(id).unwrap().unwrap();

    assert_eq!(loaded.id, id);
    assert_eq!(loaded.title, "Dune");
    assert_eq!(loaded.author, "Herbert");
    assert_eq!(loaded.publication_year, 1965);
    assert_eq!(loaded.price, 19.99);
    assert_eq!(loaded.to_new_book(), dune());
}

#[test]
fn list_is_empty_then_follows_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    assert!(repo.list_books().unwrap().is_empty());

    repo.insert_book(&NewBook::new("B", "x", 2000, 1.0)).unwrap();
    repo.insert_book(&NewBook::new("A", "x", 2001, 2.0)).unwrap();
    repo.insert_book(&NewBook::new("C", "x", 2002, 3.0)).unwrap();

    let titles: Vec<_> = repo
        .list_books()
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(titles, vec!["B", "A", "C"]);
    assert_eq!(repo.count_books().unwrap(), 3);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let first = repo.insert_book(&dune()).unwrap();
    let second = repo.insert_book(&dune()).unwrap();
    repo.delete_by_id(second).unwrap();
    let third = repo.insert_book(&dune()).unwrap();

    assert!(second > first);
    assert!(third > second);
}

#[test]
fn title_update_touches_every_exact_match_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    repo.insert_book(&dune()).unwrap();
    repo.insert_book(&NewBook::new("Dune", "Someone Else", 2021, 9.0))
        .unwrap();
    repo.insert_book(&NewBook::new("dune", "Herbert", 1965, 5.0))
        .unwrap();
    repo.insert_book(&NewBook::new("Dune Messiah", "Herbert", 1969, 17.5))
        .unwrap();

    assert_eq!(repo.update_price_by_title("Dune", 30.0).unwrap(), 2);

    let prices: Vec<_> = repo
        .list_books()
        .unwrap()
        .into_iter()
        .map(|book| book.price)
        .collect();
    assert_eq!(prices, vec![30.0, 30.0, 5.0, 17.5]);
}

#[test]
fn zero_match_title_mutations_are_noops() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    repo.insert_book(&dune()).unwrap();
    let before = repo.list_books().unwrap();

    assert_eq!(repo.update_price_by_title("Nonexistent", 1.0).unwrap(), 0);
    assert_eq!(repo.delete_by_title("Nonexistent").unwrap(), 0);

    assert_eq!(repo.list_books().unwrap(), before);
}

#[test]
fn delete_by_title_removes_all_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    repo.insert_book(&dune()).unwrap();
    repo.insert_book(&dune()).unwrap();
    repo.insert_book(&NewBook::new("Emma", "Austen", 1815, 7.0))
        .unwrap();

    assert_eq!(repo.delete_by_title("Dune").unwrap(), 2);
    assert_eq!(repo.count_books().unwrap(), 1);
}

#[test]
fn id_keyed_mutations_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let id = repo.insert_book(&dune()).unwrap();

    repo.update_price_by_id(id, 21.0).unwrap();
    assert_eq!(repo.get_book(id).unwrap().unwrap().price, 21.0);

    assert!(matches!(
        repo.update_price_by_id(id + 100, 1.0),
        Err(RepoError::NotFound(missing)) if missing == id + 100
    ));
    repo.delete_by_id(id).unwrap();
    assert!(matches!(repo.delete_by_id(id), Err(RepoError::NotFound(_))));
    assert!(repo.get_book(id).unwrap().is_none());
}

#[test]
fn find_by_author_is_exact_and_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    repo.insert_book(&dune()).unwrap();
    repo.insert_book(&NewBook::new("Dune Messiah", "Herbert", 1969, 17.5))
        .unwrap();
    repo.insert_book(&NewBook::new("Other", "Frank Herbert", 1970, 1.0))
        .unwrap();
    repo.insert_book(&NewBook::new("Lower", "herbert", 1971, 1.0))
        .unwrap();

    assert_eq!(
        repo.find_titles_by_author("Herbert").unwrap(),
        vec!["Dune", "Dune Messiah"]
    );
    assert!(repo.find_titles_by_author("Herb").unwrap().is_empty());
}

#[test]
fn validation_failure_blocks_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let err = repo
        .insert_book(&NewBook::new("", "Herbert", 1965, 1.0))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(BookValidationError::EmptyTitle)
    ));
    assert!(matches!(
        repo.update_price_by_title("Dune", f64::INFINITY),
        Err(RepoError::Validation(BookValidationError::NonFinitePrice(_)))
    ));
    assert_eq!(repo.count_books().unwrap(), 0);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteBookRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, SCHEMA_VERSION),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_catalog_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
        .unwrap();

    assert!(matches!(
        SqliteBookRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("livros"))
    ));
}

#[test]
fn repository_rejects_catalog_table_missing_price_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE livros (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            titulo TEXT NOT NULL,
            autor TEXT NOT NULL,
            ano_publicacao INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
        .unwrap();

    assert!(matches!(
        SqliteBookRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "livros",
            column: "preco"
        })
    ));
}
