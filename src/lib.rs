pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod library;
pub mod storage;

pub use error::{BibliothequeError, Result};
