use livraria_core::{Book, BookValidationError, NewBook};

#[test]
fn new_book_keeps_fields_verbatim() {
    let book = NewBook::new("  Dune ", "Herbert", 1965, 19.99);

    assert_eq!(book.title, "  Dune ");
    assert_eq!(book.author, "Herbert");
    assert_eq!(book.publication_year, 1965);
    assert_eq!(book.price, 19.99);
    assert!(book.validate().is_ok());
}

#[test]
fn parse_reports_first_invalid_field() {
    assert_eq!(
        NewBook::parse("", "Herbert", "1965", "19.99").unwrap_err(),
        BookValidationError::EmptyTitle
    );
    assert_eq!(
        NewBook::parse("Dune", "Herbert", "1965.5", "19.99").unwrap_err(),
        BookValidationError::InvalidYear("1965.5".to_string())
    );
    assert!(NewBook::parse("Dune", "Herbert", "1965", "inf").is_err());
}

#[test]
fn book_serialization_uses_expected_fields() {
    let book = Book {
        id: 7,
        title: "Dune".to_string(),
        author: "Herbert".to_string(),
        publication_year: 1965,
        price: 19.99,
    };

    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["title"], "Dune");
    assert_eq!(json["author"], "Herbert");
    assert_eq!(json["publication_year"], 1965);
    assert_eq!(json["price"], 19.99);

    let decoded: Book = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, book);
}
