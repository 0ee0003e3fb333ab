use super::CommandHandler;
use crate::cli::session::CommandContext;
use crate::Result;

/// Handler for the `path` command
pub struct PathCommand;

impl CommandHandler for PathCommand {
    fn execute(&self, context: &mut CommandContext) -> Result<()> {
        let path = context.store.file_path(context.format);
        let state = if path.is_file() { "exists" } else { "not saved yet" };

        println!("Directory: {}", context.store.base_dir().display());
        println!("File:      {} ({state})", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "path"
    }
}
