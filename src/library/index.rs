//! Key lookup maps over the catalog arena and their reconstruction after a load

use std::collections::HashMap;

use tracing::debug;

use super::DomainError;
use crate::catalog::{Catalog, Category};

/// Normalize a lookup key: surrounding whitespace is ignored and comparison is
/// case-insensitive.
pub(crate) fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Positions of books, categories and users in the catalog, by normalized key
#[derive(Debug, Default, Clone)]
pub(crate) struct CatalogIndex {
    books: HashMap<String, usize>,
    categories: HashMap<String, usize>,
    users: HashMap<String, usize>,
}

impl CatalogIndex {
    pub fn book(&self, isbn: &str) -> Option<usize> {
        lookup(&self.books, isbn)
    }

    pub fn category(&self, name: &str) -> Option<usize> {
        lookup(&self.categories, name)
    }

    pub fn user(&self, email: &str) -> Option<usize> {
        lookup(&self.users, email)
    }

    pub fn insert_book(&mut self, isbn: &str, position: usize) {
        self.books.insert(normalize_key(isbn), position);
    }

    pub fn insert_category(&mut self, name: &str, position: usize) {
        self.categories.insert(normalize_key(name), position);
    }

    pub fn insert_user(&mut self, email: &str, position: usize) {
        self.users.insert(normalize_key(email), position);
    }

    /// Rebuild every index for a freshly deserialized catalog, repairing the
    /// relations the persisted shape does not carry.
    ///
    /// Category names are trimmed and de-duplicated, each category's book list
    /// is recomputed from the books, categories only referenced by books are
    /// created, and borrowed entries are rewritten to the canonical ISBN of
    /// the matching book. Duplicate ISBNs or emails are rejected.
    pub fn rebuild(catalog: &mut Catalog) -> Result<Self, DomainError> {
        let mut index = CatalogIndex::default();

        let mut categories: Vec<Category> = Vec::with_capacity(catalog.categories.len());
        for mut category in catalog.categories.drain(..) {
            let name = category.name.trim().to_string();
            if name.is_empty() {
                continue;
            }
            let key = normalize_key(&name);
            if index.categories.contains_key(&key) {
                debug!(category = %name, "dropping duplicate category");
                continue;
            }
            category.name = name;
            category.books.clear();
            index.categories.insert(key, categories.len());
            categories.push(category);
        }

        for (position, book) in catalog.books.iter().enumerate() {
            let key = normalize_key(&book.isbn);
            if key.is_empty() {
                continue;
            }
            if index.books.insert(key, position).is_some() {
                return Err(DomainError::Conflict(format!(
                    "The catalog contains the ISBN {} more than once.",
                    book.isbn.trim()
                )));
            }
        }

        for book in catalog.books.iter_mut() {
            let name = book.category.trim().to_string();
            if name.is_empty() {
                continue;
            }
            let key = normalize_key(&name);
            let position = match index.categories.get(&key) {
                Some(&position) => position,
                None => {
                    debug!(category = %name, "creating category referenced by a book");
                    categories.push(Category::new(name));
                    index.categories.insert(key, categories.len() - 1);
                    categories.len() - 1
                }
            };
            let category = &mut categories[position];
            book.category = category.name.clone();
            category.books.push(book.isbn.clone());
        }
        catalog.categories = categories;

        for user in catalog.users.iter_mut() {
            for entry in user.borrowed.iter_mut() {
                if let Some(&position) = index.books.get(&normalize_key(entry)) {
                    *entry = catalog.books[position].isbn.clone();
                }
            }
        }

        for (position, user) in catalog.users.iter().enumerate() {
            let key = normalize_key(&user.email);
            if key.is_empty() {
                continue;
            }
            if index.users.insert(key, position).is_some() {
                return Err(DomainError::Conflict(format!(
                    "The catalog contains the email {} more than once.",
                    user.email.trim()
                )));
            }
        }

        debug!(
            books = index.books.len(),
            categories = index.categories.len(),
            users = index.users.len(),
            "catalog indexes rebuilt"
        );
        Ok(index)
    }
}

fn lookup(map: &HashMap<String, usize>, key: &str) -> Option<usize> {
    let key = normalize_key(key);
    if key.is_empty() {
        return None;
    }
    map.get(&key).copied()
}
