//! In-memory Reader
//!
//! Backs `loads(text)`: a virtual single-file source with no real
//! filesystem behind it. Relative includes resolve against the process CWD
//! the same way spec §6 specifies for `loads`, by delegating to `FsReader`
//! for anything other than the root document itself. This mirrors how the
//! teacher ships `InMemoryFs` as a complete, independent `FileSystem`
//! implementation (`src/fs/in_memory_fs.rs`) rather than special-casing
//! "no filesystem" inside the main backend.

use super::fs_reader::FsReader;
use super::types::{Reader, ReaderError};

/// Identifier used for the synthetic root document passed to `loads`.
pub const MEMORY_ROOT_ID: &str = "<memory>";

#[derive(Debug)]
pub struct MemoryReader {
    root_text: String,
    fallback: FsReader,
}

impl MemoryReader {
    pub fn new(text: impl Into<String>) -> Self {
        MemoryReader {
            root_text: text.into(),
            fallback: FsReader::new(),
        }
    }
}

impl Reader for MemoryReader {
    fn read(&self, filename: &str, base: &str) -> Result<(String, String), ReaderError> {
        if filename == MEMORY_ROOT_ID {
            return Ok((MEMORY_ROOT_ID.to_string(), self.root_text.clone()));
        }
        self.fallback.read(filename, base)
    }

    fn is_directory(&self, filename: &str, base: &str) -> bool {
        if filename == MEMORY_ROOT_ID {
            return false;
        }
        self.fallback.is_directory(filename, base)
    }

    fn read_dir(&self, filename: &str, base: &str) -> Result<Vec<String>, ReaderError> {
        self.fallback.read_dir(filename, base)
    }

    fn glob(&self, pattern: &str, base: &str) -> Result<Vec<String>, ReaderError> {
        self.fallback.glob(pattern, base)
    }

    fn parent_dir(&self, canonical_id: &str) -> String {
        if canonical_id == MEMORY_ROOT_ID {
            return ".".to_string();
        }
        self.fallback.parent_dir(canonical_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_the_synthetic_root() {
        let reader = MemoryReader::new("x 1\n");
        let (id, text) = reader.read(MEMORY_ROOT_ID, ".").unwrap();
        assert_eq!(id, MEMORY_ROOT_ID);
        assert_eq!(text, "x 1\n");
    }
}
