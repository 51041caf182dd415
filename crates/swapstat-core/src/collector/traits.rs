//! Abstractions for filesystem and clock access to enable testing and mocking.
//!
//! The `FileSystem` trait allows the collector to work with both the real
//! `/proc` filesystem on Linux and mock implementations for testing on macOS
//! or in CI. The `Clock` trait does the same for the wall clock used to time
//! swap I/O samples.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};

/// Abstraction for filesystem operations.
///
/// This trait allows collectors to read from the real filesystem or from
/// a mock implementation for testing purposes.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    ///
    /// # Arguments
    /// * `path` - Path to the file to read
    ///
    /// # Returns
    /// The file contents as a string, or an I/O error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks that a file can be opened for reading.
    ///
    /// Unlike [`FileSystem::exists`], this fails for files that exist but are
    /// not readable by the current process.
    fn open(&self, path: &Path) -> io::Result<()>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Reports whether `path` is a directory.
    ///
    /// # Returns
    /// `Ok(true)` for directories, `Ok(false)` for other existing entries and
    /// an I/O error (usually `NotFound`) when the path cannot be inspected.
    fn is_dir(&self, path: &Path) -> io::Result<bool>;
}

/// Real filesystem implementation that delegates to `std::fs`.
///
/// Use this in production to read from the actual `/proc` filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn open(&self, path: &Path) -> io::Result<()> {
        File::open(path).map(|_| ())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        std::fs::metadata(path).map(|meta| meta.is_dir())
    }
}

/// Source of wall-clock time for sample timestamps and rate intervals.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_real_fs_read_to_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meminfo");
        fs::write(&path, "SwapTotal: 1024 kB\n").unwrap();

        let fs = RealFs::new();
        let content = fs.read_to_string(&path).unwrap();
        assert_eq!(content, "SwapTotal: 1024 kB\n");
    }

    #[test]
    fn test_real_fs_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swaps");
        fs::write(&path, "Filename Type Size Used Priority\n").unwrap();

        let fs = RealFs::new();
        assert!(fs.open(&path).is_ok());
        let err = fs.open(&dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_real_fs_exists() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFs::new();
        assert!(fs.exists(dir.path()));
        assert!(!fs.exists(Path::new("/nonexistent/path/12345")));
    }

    #[test]
    fn test_real_fs_is_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vmstat");
        fs::write(&file, "pswpin 0\n").unwrap();

        let fs = RealFs::new();
        assert!(fs.is_dir(dir.path()).unwrap());
        assert!(!fs.is_dir(&file).unwrap());
        assert_eq!(
            fs.is_dir(&dir.path().join("missing")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
