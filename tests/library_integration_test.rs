//! Catalog rules exercised through the public `Library` API

use bibliotheque::catalog::{Book, Catalog, Category, User};
use bibliotheque::library::{DomainError, Library};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn book(isbn: &str, category: &str) -> Book {
    Book {
        title: format!("Title {isbn}"),
        author: "Author".to_string(),
        published: date(),
        isbn: isbn.to_string(),
        category: category.to_string(),
        added: date(),
    }
}

fn user(email: &str, borrowed: &[&str]) -> User {
    User {
        surname: "Doe".to_string(),
        given_name: "Jane".to_string(),
        email: email.to_string(),
        registered: date(),
        borrowed: borrowed.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_reconstructs_indexes_from_a_loaded_catalog() {
    let catalog = Catalog {
        books: vec![book("A-1", "science"), book("A-2", "History"), book("A-3", "Art")],
        categories: vec![Category::new("Science"), Category::new(" History "), Category::new("  ")],
        users: vec![user("jane@example.org", &["a-1"])],
    };

    let library = Library::with_catalog(catalog, 5).unwrap();

    let names: Vec<&str> = library.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Science", "History", "Art"]);
    assert_eq!(library.find_book_by_isbn("a-1").unwrap().category, "Science");
    assert_eq!(library.find_category("art").unwrap().book_isbns(), ["A-3".to_string()]);
    assert_eq!(library.borrower_of("A-1").unwrap().email, "jane@example.org");
    assert!(library.is_available("A-2"));
}

#[test]
fn test_loaded_duplicates_are_rejected() {
    let mut library = Library::default();
    library.add_category("Kept").unwrap();

    let catalog = Catalog {
        books: vec![book("X", "c"), book(" x ", "c")],
        ..Catalog::default()
    };
    assert!(matches!(library.replace_catalog(catalog), Err(DomainError::Conflict(_))));

    let catalog = Catalog {
        users: vec![user("a@b.c", &[]), user("A@B.C", &[])],
        ..Catalog::default()
    };
    assert!(matches!(library.replace_catalog(catalog), Err(DomainError::Conflict(_))));

    assert!(library.find_category("kept").is_some());
}

#[test]
fn test_capacity_limit_is_configurable() {
    let mut library = Library::new(2);
    for isbn in ["1", "2", "3"] {
        library.add_book("t", "a", date(), isbn, "c").unwrap();
    }
    library.add_user("Doe", "Jane", "jane@example.org").unwrap();

    library.borrow("1", "jane@example.org").unwrap();
    library.borrow("2", "jane@example.org").unwrap();
    let err = library.borrow("3", "jane@example.org").unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    library.return_book("1", "JANE@example.org").unwrap();
    library.borrow("3", "jane@example.org").unwrap();
    assert_eq!(library.find_user_by_email("jane@example.org").unwrap().loan_count(), 2);
}

#[test]
fn test_uniqueness_is_case_insensitive() {
    let mut library = Library::default();
    library.add_book("t", "a", date(), "ISBN-1", "c").unwrap();
    library.add_user("Doe", "Jane", "Jane@Example.org").unwrap();

    assert!(matches!(
        library.add_book("t", "a", date(), " isbn-1 ", "c"),
        Err(DomainError::Conflict(_))
    ));
    assert!(matches!(
        library.add_user("Roe", "Jim", "jane@example.ORG"),
        Err(DomainError::Conflict(_))
    ));
    assert!(matches!(
        library.add_user("", "Jim", "jim@example.org"),
        Err(DomainError::Validation(_))
    ));
    assert_eq!(library.books().len(), 1);
    assert_eq!(library.users().len(), 1);
}

#[test]
fn test_unknown_references() {
    let mut library = Library::default();
    library.add_book("t", "a", date(), "1", "c").unwrap();
    library.add_user("Doe", "Jane", "jane@example.org").unwrap();

    assert!(matches!(
        library.borrow("nope", "jane@example.org"),
        Err(DomainError::Reference(_))
    ));
    assert!(matches!(
        library.borrow("1", "nobody@example.org"),
        Err(DomainError::Reference(_))
    ));
    assert!(matches!(
        library.return_book("1", "jane@example.org"),
        Err(DomainError::Reference(_))
    ));
}

#[test]
fn test_unresolved_loan_never_captures_a_new_book() {
    let catalog = Catalog {
        users: vec![user("a@b.c", &["ghost"]), user("x@y.z", &[])],
        ..Catalog::default()
    };
    let mut library = Library::with_catalog(catalog, 5).unwrap();

    assert!(matches!(
        library.add_book("t", "a", date(), "ghost", "c"),
        Err(DomainError::Conflict(_))
    ));
    assert!(library.find_book_by_isbn("ghost").is_none());
    assert!(matches!(
        library.borrow("ghost", "x@y.z"),
        Err(DomainError::Reference(_))
    ));
    assert_eq!(library.find_user_by_email("a@b.c").unwrap().loan_count(), 1);
}
