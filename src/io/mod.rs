pub mod identity;
pub mod paths;

pub use identity::AccountIdentity;
pub use paths::LibraryPaths;
