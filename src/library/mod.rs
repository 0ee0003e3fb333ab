//! Domain service owning the live catalog
//!
//! All mutations go through [`Library`], which keeps the key indexes in step
//! with the catalog and enforces the uniqueness and capacity rules.

mod error;
mod index;

pub use error::DomainError;

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::catalog::{Book, Catalog, Category, User};
use index::{normalize_key, CatalogIndex};

/// Default number of books a user may hold at once
pub const DEFAULT_MAX_LOANS: usize = 5;

/// The in-memory library: a catalog plus the indexes that resolve its keys
#[derive(Debug, Clone)]
pub struct Library {
    catalog: Catalog,
    index: CatalogIndex,
    max_loans: usize,
}

impl Default for Library {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LOANS)
    }
}

impl Library {
    /// Create an empty library allowing `max_loans` books per user
    pub fn new(max_loans: usize) -> Self {
        Self {
            catalog: Catalog::default(),
            index: CatalogIndex::default(),
            max_loans,
        }
    }

    /// Create a library around an existing catalog, rebuilding its indexes
    pub fn with_catalog(catalog: Catalog, max_loans: usize) -> Result<Self, DomainError> {
        let mut library = Self::new(max_loans);
        library.replace_catalog(catalog)?;
        Ok(library)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Give up the library, keeping its catalog
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    pub fn max_loans(&self) -> usize {
        self.max_loans
    }

    pub fn books(&self) -> &[Book] {
        &self.catalog.books
    }

    pub fn categories(&self) -> &[Category] {
        &self.catalog.categories
    }

    pub fn users(&self) -> &[User] {
        &self.catalog.users
    }

    /// Install a new catalog (typically one just loaded from disk).
    ///
    /// The indexes are rebuilt on the incoming catalog before it replaces the
    /// live one; on error the live catalog is left untouched.
    pub fn replace_catalog(&mut self, mut catalog: Catalog) -> Result<(), DomainError> {
        let index = CatalogIndex::rebuild(&mut catalog)?;
        self.catalog = catalog;
        self.index = index;
        Ok(())
    }

    /// Register a category, or return the existing one with the same name
    pub fn add_category(&mut self, name: &str) -> Result<&Category, DomainError> {
        let position = self.ensure_category(name)?;
        Ok(&self.catalog.categories[position])
    }

    /// Register a new user. The email must not already be in use.
    pub fn add_user(
        &mut self,
        surname: &str,
        given_name: &str,
        email: &str,
    ) -> Result<&User, DomainError> {
        let surname = required(surname, "surname")?;
        let given_name = required(given_name, "given name")?;
        let email = required(email, "email")?;

        if self.index.user(email).is_some() {
            return Err(DomainError::Conflict(
                "A user with this email already exists.".to_string(),
            ));
        }

        let position = self.catalog.users.len();
        self.catalog.users.push(User {
            surname: surname.to_string(),
            given_name: given_name.to_string(),
            email: email.to_string(),
            registered: today(),
            borrowed: Vec::new(),
        });
        self.index.insert_user(email, position);
        debug!(email, "user added");

        Ok(&self.catalog.users[position])
    }

    /// Add a new book, creating its category when needed. The ISBN must not
    /// already be in use.
    pub fn add_book(
        &mut self,
        title: &str,
        author: &str,
        published: NaiveDate,
        isbn: &str,
        category: &str,
    ) -> Result<&Book, DomainError> {
        let title = required(title, "title")?;
        let author = required(author, "author")?;
        let isbn = required(isbn, "ISBN")?;
        required(category, "category")?;

        if self.index.book(isbn).is_some() {
            return Err(DomainError::Conflict(
                "A book with this ISBN already exists.".to_string(),
            ));
        }
        // Loans whose book is gone still hold their ISBN
        if self.borrower_position(isbn).is_some() {
            return Err(DomainError::Conflict(
                "This ISBN is still listed in a user's loans.".to_string(),
            ));
        }

        let category_position = self.ensure_category(category)?;
        let category = &mut self.catalog.categories[category_position];
        category.books.push(isbn.to_string());

        let position = self.catalog.books.len();
        self.catalog.books.push(Book {
            title: title.to_string(),
            author: author.to_string(),
            published,
            isbn: isbn.to_string(),
            category: category.name.clone(),
            added: today(),
        });
        self.index.insert_book(isbn, position);
        debug!(isbn, "book added");

        Ok(&self.catalog.books[position])
    }

    /// Lend a book to a user.
    ///
    /// The book must be available and the user below the loan limit.
    pub fn borrow(&mut self, isbn: &str, email: &str) -> Result<(), DomainError> {
        let book = self.index.book(isbn).ok_or_else(|| {
            DomainError::Reference("This book does not belong to the library.".to_string())
        })?;
        let user = self
            .index
            .user(email)
            .ok_or_else(|| DomainError::Reference("This user does not exist.".to_string()))?;

        let canonical = self.catalog.books[book].isbn.clone();
        if self.borrower_position(&canonical).is_some() {
            return Err(DomainError::Conflict(
                "The book is already borrowed.".to_string(),
            ));
        }

        let user = &mut self.catalog.users[user];
        if user.borrowed.len() >= self.max_loans {
            return Err(DomainError::Conflict(
                "The user has reached the maximum number of loans allowed.".to_string(),
            ));
        }

        debug!(isbn = %canonical, email = %user.email, "book borrowed");
        user.borrowed.push(canonical);
        Ok(())
    }

    /// Record that a user gave a book back
    pub fn return_book(&mut self, isbn: &str, email: &str) -> Result<(), DomainError> {
        let not_borrowed =
            || DomainError::Reference("This book is not borrowed by this user.".to_string());

        let user = self.index.user(email).ok_or_else(not_borrowed)?;
        let key = normalize_key(isbn);
        if key.is_empty() {
            return Err(not_borrowed());
        }

        let user = &mut self.catalog.users[user];
        let slot = user
            .borrowed
            .iter()
            .position(|entry| normalize_key(entry) == key)
            .ok_or_else(not_borrowed)?;
        let returned = user.borrowed.remove(slot);
        debug!(isbn = %returned, email = %user.email, "book returned");
        Ok(())
    }

    /// Look a book up by ISBN (trimmed, case-insensitive)
    pub fn find_book_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.index.book(isbn).map(|position| &self.catalog.books[position])
    }

    /// Look a user up by email (trimmed, case-insensitive)
    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.index.user(email).map(|position| &self.catalog.users[position])
    }

    /// Look a category up by name (trimmed, case-insensitive)
    pub fn find_category(&self, name: &str) -> Option<&Category> {
        self.index
            .category(name)
            .map(|position| &self.catalog.categories[position])
    }

    /// The user currently holding the book, if any
    pub fn borrower_of(&self, isbn: &str) -> Option<&User> {
        self.borrower_position(isbn)
            .map(|position| &self.catalog.users[position])
    }

    pub fn is_available(&self, isbn: &str) -> bool {
        self.borrower_position(isbn).is_none()
    }

    /// Books classified under a category, in the order they were added
    pub fn books_in_category<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Book> + 'a {
        self.find_category(name)
            .map(|category| category.books.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|isbn| self.find_book_by_isbn(isbn))
    }

    /// Titles of the books a user holds; entries that no longer resolve to a
    /// catalog book are shown by ISBN.
    pub fn borrowed_titles(&self, user: &User) -> Vec<String> {
        user.borrowed
            .iter()
            .map(|isbn| {
                self.find_book_by_isbn(isbn)
                    .map(|book| book.title.clone())
                    .unwrap_or_else(|| isbn.clone())
            })
            .collect()
    }

    fn borrower_position(&self, isbn: &str) -> Option<usize> {
        let key = normalize_key(isbn);
        if key.is_empty() {
            return None;
        }
        self.catalog
            .users
            .iter()
            .position(|user| user.borrowed.iter().any(|entry| normalize_key(entry) == key))
    }

    fn ensure_category(&mut self, name: &str) -> Result<usize, DomainError> {
        let name = required(name, "category name")?;
        if let Some(position) = self.index.category(name) {
            return Ok(position);
        }

        let position = self.catalog.categories.len();
        self.catalog.categories.push(Category::new(name));
        self.index.insert_category(name, position);
        debug!(category = name, "category added");
        Ok(position)
    }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::required(field));
    }
    Ok(trimmed)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
