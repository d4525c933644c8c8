//! Template group stores.

mod filesystem;
mod memory;

pub use filesystem::FilesystemTemplateStore;
pub use memory::InMemoryTemplateStore;
