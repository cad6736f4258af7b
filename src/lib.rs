pub mod archive;
pub mod config;
pub mod episode;
pub mod error;
pub mod feed;
pub mod http;
pub mod progress;
pub mod run;

// Re-export main types for convenience
pub use archive::{ensure_directory, episode_path, should_download};
pub use config::{Config, FeedEntry, Options};
pub use episode::{download_episode, episode_filename};
pub use error::{
    ArchiveError, ConfigError, DownloadError, FeedError, FetchError, ParseError,
};
pub use feed::{FeedItem, fetch_feed, fetch_feed_bytes, parse_feed};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use run::{FeedReport, RunSummary, archive_all, archive_feed};
