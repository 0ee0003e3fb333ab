pub mod types;

pub use types::{Book, Catalog, Category, User};
