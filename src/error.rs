use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or scaffolding the config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path} is not valid JSON: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("download-location must not be empty")]
    EmptyDownloadRoot,

    #[error("Config already exists at {path}")]
    AlreadyExists { path: PathBuf },

    #[error("Failed to write config file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine a home directory for the config file")]
    NoHomeDirectory,
}

/// Errors that can occur when fetching a feed over HTTP
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Errors that can occur when parsing feed XML
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed feed XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Errors that can occur when creating archive directories
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during an episode download
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error(transparent)]
    Request(#[from] FetchError),

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to create file {path}: {source}")]
    FileCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {path}: {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream error while downloading {url}: {source}")]
    StreamFailed {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Feed-scoped errors, caught by the driver so one bad feed does not
/// abort the rest of the run
#[derive(Error, Debug)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}
