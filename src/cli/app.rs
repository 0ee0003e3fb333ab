use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::storage::FormatKind;

/// Bibliotheque: an encrypted catalog of books, categories and users
#[derive(Parser, Debug)]
#[command(name = "bibliotheque")]
#[command(version)]
#[command(about = "Manage an encrypted library catalog of books, categories and users")]
#[command(
    long_about = "Bibliotheque keeps books, categories, users and loans in an encrypted file. Every command unlocks the file with your password (three attempts, then the file is deleted), applies the change and saves it back."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Payload encoding inside the encrypted file [default: from settings]
    #[arg(long, global = true, value_enum)]
    pub format: Option<FormatKind>,

    /// Directory holding the encrypted library files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Settings file [default: platform config directory]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log verbosity (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a book, creating its category if needed
    AddBook {
        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        isbn: String,

        #[arg(long)]
        category: String,

        /// Publication date (YYYY-MM-DD) [default: today]
        #[arg(long)]
        published: Option<NaiveDate>,
    },

    /// Register a user
    AddUser {
        #[arg(long)]
        surname: String,

        #[arg(long)]
        given_name: String,

        #[arg(long)]
        email: String,
    },

    /// Add a category
    AddCategory {
        /// Category name
        name: String,
    },

    /// Lend a book to a user
    Borrow {
        #[arg(long)]
        isbn: String,

        #[arg(long)]
        email: String,
    },

    /// Record a returned book
    Return {
        #[arg(long)]
        isbn: String,

        #[arg(long)]
        email: String,
    },

    /// List books, users and categories
    List,

    /// Show where the library is stored
    Path,
}

impl Commands {
    /// Get the command name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Commands::AddBook { .. } => "add-book",
            Commands::AddUser { .. } => "add-user",
            Commands::AddCategory { .. } => "add-category",
            Commands::Borrow { .. } => "borrow",
            Commands::Return { .. } => "return",
            Commands::List => "list",
            Commands::Path => "path",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_book() {
        let cli = Cli::try_parse_from([
            "bibliotheque",
            "add-book",
            "--title",
            "Candide",
            "--author",
            "Voltaire",
            "--isbn",
            "978-2",
            "--category",
            "Philosophy",
            "--published",
            "1759-01-15",
            "--format",
            "binary",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(FormatKind::Bin));
        assert_eq!(cli.command.name(), "add-book");
        match cli.command {
            Commands::AddBook { published, .. } => {
                assert_eq!(published, NaiveDate::from_ymd_opt(1759, 1, 15));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bad_date_rejected() {
        let result = Cli::try_parse_from([
            "bibliotheque",
            "add-book",
            "--title",
            "t",
            "--author",
            "a",
            "--isbn",
            "i",
            "--category",
            "c",
            "--published",
            "15/01/1759",
        ]);
        assert!(result.is_err());
    }
}
