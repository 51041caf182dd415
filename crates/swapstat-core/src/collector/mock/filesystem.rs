//! In-memory mock filesystem for testing collectors without real `/proc`.
//!
//! This module provides `MockFs` which simulates a filesystem in memory,
//! allowing tests to run on macOS and in CI environments without Linux.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
///
/// Stores files and directories in memory, allowing tests to simulate
/// various `/proc` filesystem states without needing actual Linux access.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Set of directories.
    directories: HashSet<PathBuf>,
    /// Files that exist but cannot be opened (permission denied).
    unreadable: HashSet<PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content, replacing any previous content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    /// Removes a file, simulating a data source missing on this kernel.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.files.remove(path);
        self.unreadable.remove(path);
    }

    /// Marks an existing file as unreadable, like `chmod 000`.
    pub fn deny_read(&mut self, path: impl AsRef<Path>) {
        self.unreadable.insert(path.as_ref().to_path_buf());
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }

    fn check_readable(&self, path: &Path) -> io::Result<()> {
        if !self.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            ));
        }
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {:?}", path),
            ));
        }
        Ok(())
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.check_readable(path)?;
        Ok(self.files[path].clone())
    }

    fn open(&self, path: &Path) -> io::Result<()> {
        self.check_readable(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        if self.directories.contains(path) {
            Ok(true)
        } else if self.files.contains_key(path) {
            Ok(false)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file or directory: {:?}", path),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_add_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/meminfo", "SwapTotal: 16384 kB\n");

        assert!(fs.exists(Path::new("/proc/meminfo")));
        assert!(fs.exists(Path::new("/proc")));

        let content = fs.read_to_string(Path::new("/proc/meminfo")).unwrap();
        assert_eq!(content, "SwapTotal: 16384 kB\n");
    }

    #[test]
    fn test_mock_fs_is_dir() {
        let mut fs = MockFs::new();
        fs.add_file("/host/proc/swaps", "");
        fs.add_dir("/empty");

        assert!(fs.is_dir(Path::new("/host/proc")).unwrap());
        assert!(fs.is_dir(Path::new("/empty")).unwrap());
        assert!(!fs.is_dir(Path::new("/host/proc/swaps")).unwrap());
        assert_eq!(
            fs.is_dir(Path::new("/dummy")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_mock_fs_remove_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/vmstat", "pswpin 1\n");
        fs.remove_file("/proc/vmstat");

        assert!(!fs.exists(Path::new("/proc/vmstat")));
        assert!(fs.open(Path::new("/proc/vmstat")).is_err());
    }

    #[test]
    fn test_mock_fs_deny_read() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/meminfo", "SwapTotal: 1 kB\n");
        fs.deny_read("/proc/meminfo");

        assert!(fs.exists(Path::new("/proc/meminfo")));
        let err = fs.read_to_string(Path::new("/proc/meminfo")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(
            fs.open(Path::new("/proc/meminfo")).unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_mock_fs_not_found() {
        let fs = MockFs::new();
        let result = fs.read_to_string(Path::new("/nonexistent"));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
