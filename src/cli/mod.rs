pub mod app;
pub mod commands;
pub mod session;

pub use app::{Cli, Commands, LogLevel};
pub use session::{CommandContext, Prompter, Session, StdinPrompter};
