//! Collector configuration and the static description handed to the host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collector::procfs::DEFAULT_PROC_PATH;
use crate::metric::{PLUGIN_NAME, SOURCE_KIND, VENDOR};

/// Config key overriding the proc base directory.
pub const PROC_PATH_KEY: &str = "proc_path";

/// Version of the metric catalog.
pub const PLUGIN_VERSION: u32 = 5;

/// Host-supplied configuration items.
///
/// Only [`PROC_PATH_KEY`] is recognized; other keys are carried but ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    items: BTreeMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with only a `proc_path` override.
    pub fn with_proc_path(path: impl Into<String>) -> Self {
        let mut config = Self::new();
        config.insert(PROC_PATH_KEY, path);
        config
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    /// The `proc_path` override; an empty value counts as absent.
    pub fn proc_path(&self) -> Option<&str> {
        self.get(PROC_PATH_KEY).filter(|path| !path.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Config {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// How the host spreads calls over collector instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    /// Every call for one task goes to the same instance.
    Sticky,
}

/// Static description of the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginMeta {
    pub name: &'static str,
    pub version: u32,
    pub routing: RoutingStrategy,
    /// Maximum number of concurrent calls per instance.
    pub concurrency: usize,
}

/// One accepted configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigRule {
    pub key: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
}

/// Configuration keys accepted under a namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigPolicy {
    pub namespace: Vec<&'static str>,
    pub rules: Vec<ConfigRule>,
}

/// Sticky routing with one call at a time: the I/O history is not shared
/// between concurrent polls.
pub fn plugin_meta() -> PluginMeta {
    PluginMeta {
        name: PLUGIN_NAME,
        version: PLUGIN_VERSION,
        routing: RoutingStrategy::Sticky,
        concurrency: 1,
    }
}

pub fn config_policy() -> ConfigPolicy {
    ConfigPolicy {
        namespace: vec![VENDOR, SOURCE_KIND, PLUGIN_NAME],
        rules: vec![ConfigRule {
            key: PROC_PATH_KEY,
            required: false,
            default: Some(DEFAULT_PROC_PATH),
        }],
    }
}
