use chrono::{Local, NaiveDate};

use super::CommandHandler;
use crate::cli::session::CommandContext;
use crate::Result;

/// Handler for the `add-book` command
pub struct AddBookCommand {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    pub published: Option<NaiveDate>,
}

impl AddBookCommand {
    pub fn new(
        title: String,
        author: String,
        isbn: String,
        category: String,
        published: Option<NaiveDate>,
    ) -> Self {
        Self {
            title,
            author,
            isbn,
            category,
            published,
        }
    }
}

impl CommandHandler for AddBookCommand {
    fn execute(&self, context: &mut CommandContext) -> Result<()> {
        let mut session = context.open()?;
        let published = self
            .published
            .unwrap_or_else(|| Local::now().date_naive());

        let book = session.library.add_book(
            &self.title,
            &self.author,
            published,
            &self.isbn,
            &self.category,
        )?;
        println!("Added \"{}\" ({}) to {}", book.title, book.isbn, book.category);

        context.save(&mut session)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "add-book"
    }
}

/// Handler for the `add-user` command
pub struct AddUserCommand {
    pub surname: String,
    pub given_name: String,
    pub email: String,
}

impl AddUserCommand {
    pub fn new(surname: String, given_name: String, email: String) -> Self {
        Self {
            surname,
            given_name,
            email,
        }
    }
}

impl CommandHandler for AddUserCommand {
    fn execute(&self, context: &mut CommandContext) -> Result<()> {
        let mut session = context.open()?;

        let user = session
            .library
            .add_user(&self.surname, &self.given_name, &self.email)?;
        println!("Registered {} <{}>", user.display_name(), user.email);

        context.save(&mut session)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "add-user"
    }
}

/// Handler for the `add-category` command
pub struct AddCategoryCommand {
    pub name: String,
}

impl AddCategoryCommand {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

impl CommandHandler for AddCategoryCommand {
    fn execute(&self, context: &mut CommandContext) -> Result<()> {
        let mut session = context.open()?;

        let category = session.library.add_category(&self.name)?;
        println!("Category \"{}\" ready", category.name);

        context.save(&mut session)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "add-category"
    }
}
