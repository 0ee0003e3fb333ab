//! Command sessions driven by a scripted password source

use std::collections::VecDeque;

use bibliotheque::cli::{CommandContext, Prompter};
use bibliotheque::io::AccountIdentity;
use bibliotheque::storage::{CatalogStore, FormatKind};
use bibliotheque::BibliothequeError;
use tempfile::TempDir;

struct ScriptedPrompter {
    passwords: VecDeque<Option<String>>,
    new_password: Option<String>,
}

impl ScriptedPrompter {
    fn new(passwords: &[Option<&str>], new_password: Option<&str>) -> Box<Self> {
        Box::new(Self {
            passwords: passwords.iter().map(|p| p.map(str::to_string)).collect(),
            new_password: new_password.map(str::to_string),
        })
    }
}

impl Prompter for ScriptedPrompter {
    fn password(&mut self, _attempt: u32) -> Option<String> {
        self.passwords.pop_front().flatten()
    }

    fn new_password(&mut self) -> Option<String> {
        self.new_password.take()
    }
}

fn context(temp_dir: &TempDir, prompter: Box<dyn Prompter>) -> CommandContext {
    let store = CatalogStore::new(temp_dir.path(), AccountIdentity::new("session"));
    CommandContext::new(store, FormatKind::Yaml, 5, prompter)
}

#[test]
fn test_new_library_saved_with_new_password() {
    let temp_dir = TempDir::new().unwrap();

    let mut ctx = context(&temp_dir, ScriptedPrompter::new(&[], Some("fresh")));
    let mut session = ctx.open().unwrap();
    assert!(session.is_new());
    session.library.add_category("Essays").unwrap();
    ctx.save(&mut session).unwrap();

    assert!(ctx.store.load(FormatKind::Yaml, Some("fresh")).is_ok());
}

#[test]
fn test_resave_uses_unlocking_password() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context(&temp_dir, ScriptedPrompter::new(&[], Some("first")));
    let mut session = ctx.open().unwrap();
    ctx.save(&mut session).unwrap();

    let prompter = ScriptedPrompter::new(&[Some("bad"), Some("first")], Some("ignored"));
    let mut ctx = context(&temp_dir, prompter);
    let mut session = ctx.open().unwrap();
    assert!(!session.is_new());
    session.library.add_user("Hugo", "Victor", "victor@example.org").unwrap();
    ctx.save(&mut session).unwrap();

    let catalog = ctx.store.load(FormatKind::Yaml, Some("first")).unwrap();
    assert_eq!(catalog.users.len(), 1);
}

#[test]
fn test_lockout_surfaces_as_persistence_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context(&temp_dir, ScriptedPrompter::new(&[], Some("secret")));
    let mut session = ctx.open().unwrap();
    ctx.save(&mut session).unwrap();

    let mut ctx = context(&temp_dir, ScriptedPrompter::new(&[None, None, None], None));
    let err = ctx.open().unwrap_err();

    assert!(matches!(err, BibliothequeError::Persistence(ref e) if e.is_lockout()));
    assert!(!ctx.store.exists(FormatKind::Yaml));
}
