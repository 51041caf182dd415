//! Location of the swap data sources under a proc base directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::error::SwapError;
use crate::collector::traits::FileSystem;

/// Default base path of the proc filesystem.
pub const DEFAULT_PROC_PATH: &str = "/proc";

/// Which file supplies the swap I/O counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoFormat {
    /// `vmstat` with `pswpin`/`pswpout` records (kernel 2.6+).
    Vmstat,
    /// `stat` with a `page IN OUT` record (older kernels).
    Stat,
}

/// Paths of the four swap data sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub vmstat: PathBuf,
    pub stat: PathBuf,
    pub swaps: PathBuf,
    pub meminfo: PathBuf,
}

impl SourcePaths {
    /// Resolves every source relative to `base`.
    pub fn under(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            vmstat: base.join("vmstat"),
            stat: base.join("stat"),
            swaps: base.join("swaps"),
            meminfo: base.join("meminfo"),
        }
    }

    /// Path of the I/O counter source for `format`.
    pub fn io(&self, format: IoFormat) -> &Path {
        match format {
            IoFormat::Vmstat => &self.vmstat,
            IoFormat::Stat => &self.stat,
        }
    }
}

/// Resolved source paths plus the selected I/O format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocator {
    base: PathBuf,
    paths: SourcePaths,
    io_format: IoFormat,
}

impl SourceLocator {
    /// Resolves the sources under `base` and detects the I/O format.
    pub fn locate<F: FileSystem>(fs: &F, base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let paths = SourcePaths::under(&base);
        let mut locator = Self {
            base,
            paths,
            io_format: IoFormat::Vmstat,
        };
        locator.detect_io_format(fs);
        locator
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn paths(&self) -> &SourcePaths {
        &self.paths
    }

    pub fn io_format(&self) -> IoFormat {
        self.io_format
    }

    /// Path of the currently selected I/O counter source.
    pub fn io_path(&self) -> &Path {
        self.paths.io(self.io_format)
    }

    /// Selects `vmstat` if it can be opened, `stat` otherwise, and remembers
    /// the choice.
    pub fn detect_io_format<F: FileSystem>(&mut self, fs: &F) -> IoFormat {
        let format = if fs.open(&self.paths.vmstat).is_ok() {
            IoFormat::Vmstat
        } else {
            IoFormat::Stat
        };
        if format != self.io_format {
            debug!(
                from = ?self.io_format,
                to = ?format,
                path = %self.paths.io(format).display(),
                "swap I/O source changed"
            );
        }
        self.io_format = format;
        format
    }

    /// Sources that must be readable for the collector to work.
    pub fn required_sources(&self) -> [&Path; 3] {
        [&self.paths.swaps, &self.paths.meminfo, self.io_path()]
    }

    /// Fails with the first required source that cannot be opened.
    pub fn check_accessible<F: FileSystem>(&self, fs: &F) -> Result<(), SwapError> {
        for path in self.required_sources() {
            fs.open(path)
                .map_err(|source| SwapError::SourceUnavailable {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        Ok(())
    }
}

/// Checks that a `proc_path` override names an existing directory.
pub fn validate_proc_path<F: FileSystem>(fs: &F, path: &str) -> Result<PathBuf, SwapError> {
    let path = PathBuf::from(path);
    match fs.is_dir(&path) {
        Ok(true) => Ok(path),
        Ok(false) => Err(SwapError::Config {
            path,
            reason: "is not a directory".to_string(),
        }),
        Err(e) => Err(SwapError::Config {
            reason: e.to_string(),
            path,
        }),
    }
}
