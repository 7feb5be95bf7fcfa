//! File gateway for the Unitex pipeline.
//!
//! Every operation takes a path string and routes it either to the disk or to
//! the in-memory virtual filesystem, depending on whether the path starts with
//! [`unitex_core::VFS_PREFIX`].
//!
//! - [`vfs`] -- the in-memory store
//! - [`gateway`] -- copy / remove / move / directory / listing operations
//! - [`file`] -- a mode-checked file handle for reading and writing UTF-8 text

pub mod file;
pub mod gateway;
pub mod vfs;

pub use file::{FileMode, UnitexFile, read_binary, read_text};
pub use gateway::FileGateway;
pub use vfs::VirtualFs;
