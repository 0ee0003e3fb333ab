use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bibliotheque::{
    cli::commands::{
        catalog::{AddBookCommand, AddCategoryCommand, AddUserCommand},
        list::ListCommand,
        loan::{BorrowCommand, ReturnCommand},
        path::PathCommand,
        CommandHandler,
    },
    cli::{Cli, Commands, CommandContext, LogLevel, StdinPrompter},
    config::SettingsLoader,
    io::{AccountIdentity, LibraryPaths},
    storage::CatalogStore,
};

fn main() {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let defaults = LibraryPaths::new()?;
    let settings = SettingsLoader::new(cli.config, defaults.config_file())
        .load()
        .context("Failed to load settings")?;

    let data_dir = cli
        .data_dir
        .or(settings.data_dir)
        .unwrap_or(defaults.data_dir);
    let paths = LibraryPaths::for_data_dir(data_dir);
    paths.ensure_directories()?;

    let identity = match settings.identity {
        Some(token) => AccountIdentity::new(token),
        None => AccountIdentity::current(),
    };
    let format = cli.format.unwrap_or(settings.default_format);

    let mut context = CommandContext::new(
        CatalogStore::new(paths.data_dir, identity),
        format,
        settings.max_loans_per_user,
        Box::new(StdinPrompter),
    );

    let handler: Box<dyn CommandHandler> = match cli.command {
        Commands::AddBook {
            title,
            author,
            isbn,
            category,
            published,
        } => Box::new(AddBookCommand::new(title, author, isbn, category, published)),
        Commands::AddUser {
            surname,
            given_name,
            email,
        } => Box::new(AddUserCommand::new(surname, given_name, email)),
        Commands::AddCategory { name } => Box::new(AddCategoryCommand::new(name)),
        Commands::Borrow { isbn, email } => Box::new(BorrowCommand::new(isbn, email)),
        Commands::Return { isbn, email } => Box::new(ReturnCommand::new(isbn, email)),
        Commands::List => Box::new(ListCommand),
        Commands::Path => Box::new(PathCommand),
    };

    tracing::debug!(command = handler.name(), %format, "dispatching");
    handler
        .execute(&mut context)
        .with_context(|| format!("{} failed", handler.name()))
}

/// Initialize tracing with the given log level; RUST_LOG overrides it
fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
