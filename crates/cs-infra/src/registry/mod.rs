mod fs_registry;
pub mod index;

pub use fs_registry::FsRegistry;
