use std::fmt;

use super::CommandHandler;
use crate::cli::session::CommandContext;
use crate::library::Library;
use crate::Result;

/// Handler for the `list` command
pub struct ListCommand;

impl CommandHandler for ListCommand {
    fn execute(&self, context: &mut CommandContext) -> Result<()> {
        let session = context.open()?;
        if session.is_new() {
            println!("No library saved yet in {} format.", context.format);
            return Ok(());
        }
        print!("{}", render_listing(&session.library));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "list"
    }
}

/// Books with their status, users with their loans, categories with their
/// book counts
pub fn render_listing(library: &Library) -> String {
    Listing(library).to_string()
}

struct Listing<'a>(&'a Library);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let library = self.0;
        writeln!(out, "=> Books")?;
        if library.books().is_empty() {
            writeln!(out, "  No books.")?;
        }
        for book in library.books() {
            let status = match library.borrower_of(&book.isbn) {
                Some(user) => format!("borrowed by {}", user.display_name()),
                None => "available".to_string(),
            };
            writeln!(
                out,
                "  - {} by {} [{}] ISBN {} published {}: {}",
                book.title, book.author, book.category, book.isbn, book.published, status
            )?;
        }

        writeln!(out, "=> Users")?;
        if library.users().is_empty() {
            writeln!(out, "  No users.")?;
        }
        for user in library.users() {
            writeln!(
                out,
                "  - {} <{}>: {}/{} loans",
                user.display_name(),
                user.email,
                user.loan_count(),
                library.max_loans()
            )?;
            let titles = library.borrowed_titles(user);
            if !titles.is_empty() {
                writeln!(out, "    borrowed: {}", titles.join(", "))?;
            }
        }

        writeln!(out, "=> Categories")?;
        if library.categories().is_empty() {
            writeln!(out, "  No categories.")?;
        }
        for category in library.categories() {
            writeln!(out, "  - {} ({} books)", category.name, category.book_count())?;
        }
        Ok(())
    }
}
