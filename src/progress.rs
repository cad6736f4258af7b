use std::sync::Arc;

/// Events emitted during an archive run for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A feed is about to be fetched
    FeedStarted { title: String, url: String },

    /// A feed has been fetched and parsed
    FeedParsed { title: String, episodes: usize },

    /// A feed could not be fetched or parsed; the run continues
    FeedFailed { title: String, error: String },

    /// An episode already exists on disk and was skipped
    EpisodeSkipped { filename: String },

    /// A download is starting
    DownloadStarting {
        filename: String,
        /// Expected content length in bytes, if the server sent one
        content_length: Option<u64>,
    },

    /// Download progress update
    DownloadProgress {
        filename: String,
        bytes_downloaded: u64,
        /// When None, progress is a bare byte counter
        total_bytes: Option<u64>,
    },

    /// A download completed successfully
    DownloadCompleted {
        filename: String,
        bytes_downloaded: u64,
    },

    /// A download failed; the episode is skipped
    DownloadFailed { filename: String, error: String },

    /// The whole run finished
    RunCompleted {
        downloaded_count: usize,
        skipped_count: usize,
        failed_count: usize,
        failed_feed_count: usize,
    },
}

/// Trait for reporting progress events during an archive run.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
