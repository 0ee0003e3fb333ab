use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregate root persisted to disk: every book, category and user of a library.
///
/// Cross-references are key strings (ISBN, category name, email). The
/// collections keep insertion order so listings stay deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.categories.is_empty() && self.users.is_empty()
    }
}

/// A book owned by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    /// Publication date
    pub published: NaiveDate,
    /// Unique key, compared case-insensitively
    pub isbn: String,
    /// Name of the category this book is classified under
    pub category: String,
    /// Date the book entered the catalog
    pub added: NaiveDate,
}

/// A named group of books.
///
/// The list of classified books is derived from the books themselves and is
/// never written to disk; it is rebuilt whenever a catalog is installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique key, compared case-insensitively
    pub name: String,
    #[serde(skip)]
    pub(crate) books: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            books: Vec::new(),
        }
    }

    /// ISBNs of the books currently classified under this category
    pub fn book_isbns(&self) -> &[String] {
        &self.books
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }
}

/// A registered library user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub surname: String,
    pub given_name: String,
    /// Unique key, compared case-insensitively
    pub email: String,
    pub registered: NaiveDate,
    /// ISBNs of the books this user currently holds
    #[serde(default)]
    pub borrowed: Vec<String>,
}

impl User {
    /// "Given Surname", as shown in listings
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.surname)
    }

    pub fn loan_count(&self) -> usize {
        self.borrowed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 5, 17).unwrap()
    }

    #[test]
    fn test_category_books_are_not_serialized() {
        let mut category = Category::new("Fiction");
        category.books.push("978-0".to_string());

        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Fiction" }));

        let restored: Category = serde_json::from_value(json).unwrap();
        assert!(restored.book_isbns().is_empty());
    }

    #[test]
    fn test_catalog_missing_collections_default_to_empty() {
        let catalog: Catalog = serde_json::from_str("{}").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_user_display_name() {
        let user = User {
            surname: "Hugo".to_string(),
            given_name: "Victor".to_string(),
            email: "victor@example.org".to_string(),
            registered: sample_date(),
            borrowed: Vec::new(),
        };
        assert_eq!(user.display_name(), "Victor Hugo");
        assert_eq!(user.loan_count(), 0);
    }
}
