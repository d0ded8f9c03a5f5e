//! Reader: pluggable text-source abstraction.
//!
//! `path -> (canonical-id, contents)`, with a filesystem-backed default and
//! an in-memory variant for `loads`. See `types::Reader` for the contract.

pub mod fs_reader;
pub mod memory_reader;
pub mod types;

pub use fs_reader::FsReader;
pub use memory_reader::{MemoryReader, MEMORY_ROOT_ID};
pub use types::{Reader, ReaderError};
