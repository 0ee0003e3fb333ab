//! Unlocking, mutating and re-saving the library for one command

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::info;

use crate::library::Library;
use crate::storage::{CatalogStore, FormatKind, MAX_PASSWORD_ATTEMPTS};
use crate::Result;

/// Source of passwords for interactive commands
pub trait Prompter {
    /// Password for the given 1-based attempt. `None` selects the account
    /// default secret.
    fn password(&mut self, attempt: u32) -> Option<String>;

    /// Password protecting a library saved for the first time
    fn new_password(&mut self) -> Option<String>;
}

/// Reads passwords from stdin, printing prompts on stderr
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    fn read_line(prompt: &str) -> Option<String> {
        eprint!("{prompt}");
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let line = line.trim_end_matches(&['\r', '\n'][..]);
                if line.trim().is_empty() {
                    None
                } else {
                    Some(line.to_string())
                }
            }
        }
    }
}

impl Prompter for StdinPrompter {
    fn password(&mut self, attempt: u32) -> Option<String> {
        Self::read_line(&format!(
            "Password (attempt {attempt}/{MAX_PASSWORD_ATTEMPTS}, empty = account default): "
        ))
    }

    fn new_password(&mut self) -> Option<String> {
        Self::read_line("New password (empty = account default): ")
    }
}

/// Everything a command needs to reach the stored library
pub struct CommandContext {
    pub store: CatalogStore,
    pub format: FormatKind,
    pub max_loans: usize,
    pub prompter: Box<dyn Prompter>,
}

impl CommandContext {
    pub fn new(
        store: CatalogStore,
        format: FormatKind,
        max_loans: usize,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        Self {
            store,
            format,
            max_loans,
            prompter,
        }
    }

    /// Unlock the stored library, or start an empty one when nothing has
    /// been saved yet in this format
    pub fn open(&mut self) -> Result<Session> {
        let prompter = &mut self.prompter;
        let mut unlocked = None;
        let loaded = self.store.load_with_prompt(self.format, |attempt| {
            let candidate = prompter.password(attempt);
            unlocked = candidate.clone();
            candidate
        });

        match loaded {
            Ok(catalog) => Ok(Session {
                library: Library::with_catalog(catalog, self.max_loans)?,
                secret: unlocked,
                is_new: false,
            }),
            Err(err) if err.is_not_found() => {
                info!(format = %self.format, "starting a new library");
                Ok(Session {
                    library: Library::new(self.max_loans),
                    secret: None,
                    is_new: true,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Save the session's library. A library that has never been saved asks
    /// for a new password first.
    pub fn save(&mut self, session: &mut Session) -> Result<PathBuf> {
        if session.is_new {
            session.secret = self.prompter.new_password();
            session.is_new = false;
        }
        let path = self.store.save(
            session.library.catalog(),
            self.format,
            session.secret.as_deref(),
        )?;
        Ok(path)
    }
}

/// A library unlocked for the duration of one command
#[derive(Debug)]
pub struct Session {
    pub library: Library,
    secret: Option<String>,
    is_new: bool,
}

impl Session {
    /// Whether the library did not exist on disk when the session opened
    pub fn is_new(&self) -> bool {
        self.is_new
    }
}
