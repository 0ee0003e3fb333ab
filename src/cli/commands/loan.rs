use super::CommandHandler;
use crate::cli::session::CommandContext;
use crate::Result;

/// Handler for the `borrow` command
pub struct BorrowCommand {
    pub isbn: String,
    pub email: String,
}

impl BorrowCommand {
    pub fn new(isbn: String, email: String) -> Self {
        Self { isbn, email }
    }
}

impl CommandHandler for BorrowCommand {
    fn execute(&self, context: &mut CommandContext) -> Result<()> {
        let mut session = context.open()?;
        session.library.borrow(&self.isbn, &self.email)?;

        if let (Some(book), Some(user)) = (
            session.library.find_book_by_isbn(&self.isbn),
            session.library.find_user_by_email(&self.email),
        ) {
            println!(
                "\"{}\" lent to {} ({}/{} loans)",
                book.title,
                user.display_name(),
                user.loan_count(),
                session.library.max_loans()
            );
        }

        context.save(&mut session)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "borrow"
    }
}

/// Handler for the `return` command
pub struct ReturnCommand {
    pub isbn: String,
    pub email: String,
}

impl ReturnCommand {
    pub fn new(isbn: String, email: String) -> Self {
        Self { isbn, email }
    }
}

impl CommandHandler for ReturnCommand {
    fn execute(&self, context: &mut CommandContext) -> Result<()> {
        let mut session = context.open()?;
        session.library.return_book(&self.isbn, &self.email)?;

        if let Some(book) = session.library.find_book_by_isbn(&self.isbn) {
            println!("\"{}\" returned", book.title);
        }

        context.save(&mut session)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "return"
    }
}
