// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// Example config written by `create-config`
const EXAMPLE_CONFIG: &str = include_str!("../podvault.dist.json");

const CONFIG_FILENAME: &str = ".podvault.json";

/// Parsed configuration for an archive run.
///
/// Loaded once at startup and passed by reference through the pipeline;
/// never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub options: Options,
    #[serde(deserialize_with = "ordered_feeds", default)]
    pub feeds: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Options {
    /// Root directory all podcast directories are created under
    #[serde(rename = "download-location")]
    pub download_location: PathBuf,
}

/// One configured feed. Entries keep the order they appear in the
/// config file, which is the order feeds are processed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Podcast title, used verbatim as the directory name
    pub title: String,
    /// Feed URL
    pub url: String,
}

/// Deserialize the `feeds` JSON object into a Vec, preserving document order
fn ordered_feeds<'de, D>(deserializer: D) -> Result<Vec<FeedEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FeedsVisitor;

    impl<'de> Visitor<'de> for FeedsVisitor {
        type Value = Vec<FeedEntry>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of podcast title to feed URL")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut feeds = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((title, url)) = map.next_entry::<String, String>()? {
                feeds.push(FeedEntry { title, url });
            }
            Ok(feeds)
        }
    }

    deserializer.deserialize_map(FeedsVisitor)
}

/// Load and validate the config file.
///
/// A missing or unreadable file, invalid JSON, or a non-object root all
/// fail; no partial or default config is substituted.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config =
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidJson {
            path: path.to_path_buf(),
            source: e,
        })?;

    if config.options.download_location.as_os_str().is_empty() {
        return Err(ConfigError::EmptyDownloadRoot);
    }

    Ok(config)
}

/// Default config location: `~/.podvault.json`
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let home = env::var_os("HOME").ok_or(ConfigError::NoHomeDirectory)?;
    Ok(PathBuf::from(home).join(CONFIG_FILENAME))
}

/// Write the example config, refusing to overwrite an existing file
pub fn write_example(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    std::fs::write(path, EXAMPLE_CONFIG).map_err(|e| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
