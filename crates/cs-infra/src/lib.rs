//! Filesystem side of clipshelf: the registry index, content-addressed image
//! blobs, preview decoding and platform data directories.

pub mod fs;
pub mod preview;
pub mod registry;

pub use registry::FsRegistry;
