//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc` swap sources for testing
//! various system conditions.

use std::path::Path;

use super::filesystem::MockFs;

/// Raw values written into the four swap sources.
///
/// Fields are strings so tests can inject malformed values.
#[derive(Debug, Clone)]
pub struct SwapFixture<'a> {
    pub swap_total: &'a str,
    pub swap_free: &'a str,
    pub swap_cached: &'a str,
    pub pswpin: &'a str,
    pub pswpout: &'a str,
    pub page_in: &'a str,
    pub page_out: &'a str,
    pub sda5_size: &'a str,
    pub sda5_used: &'a str,
}

impl Default for SwapFixture<'_> {
    fn default() -> Self {
        Self {
            swap_total: "99999",
            swap_free: "1010",
            swap_cached: "2020",
            pswpin: "11111",
            pswpout: "22222",
            page_in: "33333",
            page_out: "44444",
            sda5_size: "55555",
            sda5_used: "6666",
        }
    }
}

impl SwapFixture<'_> {
    /// Writes `vmstat`, `stat`, `swaps` and `meminfo` under `base`.
    ///
    /// `swaps` lists `/dev/sda5` (from the fixture) and `/dev/sda6`
    /// (77777 kB, 8888 kB used); every file ends with a malformed line.
    pub fn install(&self, fs: &mut MockFs, base: impl AsRef<Path>) {
        let base = base.as_ref();
        fs.add_file(
            base.join("vmstat"),
            format!(
                "\
nr_free_pages 2036214
pgpgin 123456
pgpgout 654321
pswpin {}
pswpout {}
pgfault 999999
badentry
",
                self.pswpin, self.pswpout
            ),
        );
        fs.add_file(
            base.join("stat"),
            format!(
                "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
disk 0 0 0 0
page {} {}
swap 1 2
badentry
",
                self.page_in, self.page_out
            ),
        );
        fs.add_file(
            base.join("swaps"),
            format!(
                "\
Filename                                Type            Size    Used    Priority
/dev/sda5                               partition       {}      {}      -1
/dev/sda6 partition  77777 8888   -1
badentry
",
                self.sda5_size, self.sda5_used
            ),
        );
        fs.add_file(
            base.join("meminfo"),
            format!(
                "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
Cached:          2048000 kB
SwapCached:     {} kB
SwapTotal:      {} kB
SwapFree:       {} kB
bad-entry
",
                self.swap_cached, self.swap_total, self.swap_free
            ),
        );
    }
}

impl MockFs {
    /// Creates a modern kernel with two swap partitions under `/proc`.
    pub fn typical_swap() -> Self {
        Self::with_fixture(&SwapFixture::default())
    }

    /// Creates `/proc` from a fixture.
    pub fn with_fixture(fixture: &SwapFixture<'_>) -> Self {
        let mut fs = Self::new();
        fixture.install(&mut fs, "/proc");
        fs
    }

    /// Creates a pre-2.6 kernel: no `/proc/vmstat`, swap counters in
    /// `/proc/stat`.
    pub fn legacy_kernel() -> Self {
        let mut fs = Self::typical_swap();
        fs.remove_file("/proc/vmstat");
        fs
    }

    /// Creates a system with swap turned off.
    pub fn swap_disabled() -> Self {
        let mut fs = Self::new();
        fs.add_file("/proc/vmstat", "pswpin 0\npswpout 0\n");
        fs.add_file("/proc/stat", "page 0 0\n");
        fs.add_file("/proc/swaps", "Filename\tType\tSize\tUsed\tPriority\n");
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
SwapCached:            0 kB
SwapTotal:             0 kB
SwapFree:              0 kB
",
        );
        fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::traits::FileSystem;

    #[test]
    fn test_typical_swap() {
        let fs = MockFs::typical_swap();

        for file in ["vmstat", "stat", "swaps", "meminfo"] {
            assert!(fs.exists(&Path::new("/proc").join(file)), "{file}");
        }

        let swaps = fs.read_to_string(Path::new("/proc/swaps")).unwrap();
        assert!(swaps.contains("/dev/sda5"));
        assert!(swaps.contains("55555"));
    }

    #[test]
    fn test_fixture_override() {
        let fs = MockFs::with_fixture(&SwapFixture {
            swap_total: "not-an-int",
            ..Default::default()
        });
        let meminfo = fs.read_to_string(Path::new("/proc/meminfo")).unwrap();
        assert!(meminfo.contains("SwapTotal:      not-an-int kB"));
    }

    #[test]
    fn test_legacy_kernel() {
        let fs = MockFs::legacy_kernel();
        assert!(!fs.exists(Path::new("/proc/vmstat")));
        assert!(fs.exists(Path::new("/proc/stat")));
    }

    #[test]
    fn test_install_under_custom_base() {
        let mut fs = MockFs::new();
        SwapFixture::default().install(&mut fs, "/host/proc");
        assert!(fs.is_dir(Path::new("/host/proc")).unwrap());
        assert!(fs.exists(Path::new("/host/proc/meminfo")));
        assert!(!fs.exists(Path::new("/proc/meminfo")));
    }
}
