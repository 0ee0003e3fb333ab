pub mod catalog;
pub mod list;
pub mod loan;
pub mod path;

use super::session::CommandContext;
use crate::Result;

/// Common trait for all command handlers
pub trait CommandHandler {
    /// Execute the command against the stored library
    fn execute(&self, context: &mut CommandContext) -> Result<()>;

    /// Get command name for logging
    fn name(&self) -> &'static str;
}
