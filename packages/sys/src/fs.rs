//! Filesystem-backed file store.

use std::fs::File;
use std::io::{BufRead, BufReader};

use refport_core::{BackendError, FileStore};

/// [`FileStore`] over the local filesystem.
///
/// Writes are verbatim (no trailing newline is appended); reads consume
/// exactly the first line of the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysFiles;

impl SysFiles {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for SysFiles {
    fn write_text(&self, path: &str, content: &str) -> Result<(), BackendError> {
        std::fs::write(path, content)?;
        Ok(())
    }

    fn read_first_line(&self, path: &str) -> Result<String, BackendError> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut line = String::new();
        reader.read_line(&mut line)?;
        // Strip the line terminator; the engine trims the rest.
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn write_then_read_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "handle.ref");

        SysFiles.write_text(&path, "the-handle").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "the-handle");
        assert_eq!(SysFiles.read_first_line(&path).unwrap(), "the-handle");
    }

    #[test]
    fn read_consumes_only_the_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "multi.ref");

        std::fs::write(&path, "first\nsecond\nthird\n").unwrap();
        assert_eq!(SysFiles.read_first_line(&path).unwrap(), "first");
    }

    #[test]
    fn read_handles_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "crlf.ref");

        std::fs::write(&path, "first\r\nsecond\r\n").unwrap();
        assert_eq!(SysFiles.read_first_line(&path).unwrap(), "first");
    }

    #[test]
    fn read_of_empty_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "empty.ref");

        std::fs::write(&path, "").unwrap();
        assert_eq!(SysFiles.read_first_line(&path).unwrap(), "");
    }

    #[test]
    fn read_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "absent.ref");
        assert!(SysFiles.read_first_line(&path).is_err());
    }

    #[test]
    fn write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "replace.ref");

        SysFiles.write_text(&path, "old-and-longer-content").unwrap();
        SysFiles.write_text(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }
}
