//! Filesystem-backed Reader
//!
//! The default `Reader` implementation, consulting the real filesystem. This
//! is the "default implementation consults the filesystem" half of spec
//! §4.2's Reader contract; `pre_open`/`pre_read` hooks live in the Loader
//! (they wrap whichever Reader is configured, rather than being baked into
//! this one), mirroring how the teacher keeps `InMemoryFs` and the
//! filesystem concern separate from command-level hooks.

use std::path::{Path, PathBuf};

use super::types::{Reader, ReaderError};

#[derive(Debug, Default, Clone)]
pub struct FsReader;

impl FsReader {
    pub fn new() -> Self {
        FsReader
    }

    fn resolve(&self, filename: &str, base: &str) -> PathBuf {
        let path = Path::new(filename);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(base).join(path)
        }
    }

    fn canonicalize(path: &Path) -> String {
        match std::fs::canonicalize(path) {
            Ok(p) => p.to_string_lossy().into_owned(),
            // The file may not exist yet or the platform may not support
            // canonicalization; fall back to a lexical absolutization so
            // callers still get a stable id to cache and report against.
            Err(_) => path.to_string_lossy().into_owned(),
        }
    }
}

impl Reader for FsReader {
    fn read(&self, filename: &str, base: &str) -> Result<(String, String), ReaderError> {
        let resolved = self.resolve(filename, base);
        if resolved.is_dir() {
            return Err(ReaderError::IsDirectory {
                path: resolved.to_string_lossy().into_owned(),
            });
        }
        let canonical_id = Self::canonicalize(&resolved);
        let bytes = std::fs::read(&resolved).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReaderError::NotFound {
                    path: resolved.to_string_lossy().into_owned(),
                }
            } else {
                ReaderError::Other {
                    message: format!("{}: {e}", resolved.display()),
                }
            }
        })?;
        let text = String::from_utf8(bytes).map_err(|_| ReaderError::InvalidEncoding {
            path: resolved.to_string_lossy().into_owned(),
        })?;
        Ok((canonical_id, text))
    }

    fn is_directory(&self, filename: &str, base: &str) -> bool {
        self.resolve(filename, base).is_dir()
    }

    fn read_dir(&self, filename: &str, base: &str) -> Result<Vec<String>, ReaderError> {
        let resolved = self.resolve(filename, base);
        let entries = std::fs::read_dir(&resolved).map_err(|_| ReaderError::NotFound {
            path: resolved.to_string_lossy().into_owned(),
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ReaderError::Other { message: e.to_string() })?;
            names.push(entry.path().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn glob(&self, pattern: &str, base: &str) -> Result<Vec<String>, ReaderError> {
        let resolved = self.resolve(pattern, base);
        let pattern_str = resolved.to_string_lossy().into_owned();
        let mut matches = Vec::new();
        let paths = glob::glob(&pattern_str)
            .map_err(|e| ReaderError::Other { message: e.to_string() })?;
        for entry in paths {
            match entry {
                Ok(path) => matches.push(path.to_string_lossy().into_owned()),
                Err(e) => return Err(ReaderError::Other { message: e.to_string() }),
            }
        }
        Ok(matches)
    }

    fn parent_dir(&self, canonical_id: &str) -> String {
        Path::new(canonical_id)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("a.conf");
        std::fs::File::create(&file_path).unwrap().write_all(b"x 1\n").unwrap();

        let reader = FsReader::new();
        let (id, text) = reader.read("a.conf", dir.path().to_str().unwrap()).unwrap();
        assert_eq!(text, "x 1\n");
        assert!(id.ends_with("a.conf"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let reader = FsReader::new();
        let err = reader.read("missing.conf", dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ReaderError::NotFound { .. }));
    }

    #[test]
    fn detects_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let reader = FsReader::new();
        assert!(reader.is_directory("sub", dir.path().to_str().unwrap()));
    }
}
