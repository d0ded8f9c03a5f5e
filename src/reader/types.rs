//! Reader Types
//!
//! Core trait and error type for the pluggable text-source abstraction:
//! given a filename and a base directory, produce a canonical identifier and
//! the file's contents. Modeled on the teacher's `FileSystem` trait
//! (`src/fs/types.rs`): an object-safe trait so the loader can hold
//! `Arc<dyn Reader>` without caring which backend is behind it.

use thiserror::Error;

/// Failure to open or decode a configuration source.
#[derive(Error, Debug, Clone)]
pub enum ReaderError {
    #[error("no such file or directory: '{path}'")]
    NotFound { path: String },

    #[error("'{path}' is a directory")]
    IsDirectory { path: String },

    #[error("'{path}' is not valid UTF-8")]
    InvalidEncoding { path: String },

    #[error("{message}")]
    Other { message: String },
}

/// Given a filename and a base directory, resolve and read a configuration
/// source. Implementations are responsible for canonicalizing `canonical_id`
/// so that logically equivalent includes (different textual paths resolving
/// to the same file) share one AST-cache entry.
pub trait Reader: Send + Sync {
    /// Read `filename` resolved against `base`, returning its canonical id
    /// and contents.
    fn read(&self, filename: &str, base: &str) -> Result<(String, String), ReaderError>;

    /// True if the resolved path names a directory (used by
    /// `includedirectories`).
    fn is_directory(&self, filename: &str, base: &str) -> bool;

    /// List the immediate entries of a directory, in whatever order the
    /// backend enumerates them; the loader sorts them into ASCII order
    /// itself per spec.
    fn read_dir(&self, filename: &str, base: &str) -> Result<Vec<String>, ReaderError>;

    /// Expand a glob pattern (resolved against `base`) to a list of matching
    /// paths; an empty result is not an error at this layer (the loader
    /// decides whether zero matches is acceptable).
    fn glob(&self, pattern: &str, base: &str) -> Result<Vec<String>, ReaderError>;

    /// Directory component of `canonical_id`, used as the include base for
    /// files nested within it.
    fn parent_dir(&self, canonical_id: &str) -> String;
}
