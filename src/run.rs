// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::archive::{ensure_directory, episode_path, should_download};
use crate::config::Config;
use crate::episode::download_episode;
use crate::error::FeedError;
use crate::feed::fetch_feed;
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Outcome of archiving a single feed
#[derive(Debug, Clone, Default)]
pub struct FeedReport {
    /// Episodes downloaded during this run
    pub downloaded: usize,
    /// Episodes skipped because they already exist on disk
    pub skipped: usize,
    /// Failed episodes as (filename, error message)
    pub failed_episodes: Vec<(String, String)>,
}

/// Outcome of a whole archive run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub downloaded: usize,
    pub skipped: usize,
    /// Failed episodes across all feeds, as (filename, error message)
    pub failed_episodes: Vec<(String, String)>,
    /// Feeds that could not be processed at all, as (title, error message)
    pub failed_feeds: Vec<(String, String)>,
}

/// Archive one feed: ensure its directories exist, fetch and parse the
/// feed, then walk the items in parser order, downloading whatever is
/// not already on disk. A failed download is recorded and the walk
/// continues with the next episode.
pub async fn archive_feed<C: HttpClient>(
    client: &C,
    download_root: &Path,
    title: &str,
    url: &str,
    reporter: &SharedProgressReporter,
) -> Result<FeedReport, FeedError> {
    ensure_directory(download_root)?;
    ensure_directory(&download_root.join(title))?;

    reporter.report(ProgressEvent::FeedStarted {
        title: title.to_string(),
        url: url.to_string(),
    });

    let items = fetch_feed(client, url).await?;

    reporter.report(ProgressEvent::FeedParsed {
        title: title.to_string(),
        episodes: items.len(),
    });

    let mut report = FeedReport::default();

    for item in &items {
        let target = episode_path(download_root, title, &item.filename);

        if !should_download(&target) {
            reporter.report(ProgressEvent::EpisodeSkipped {
                filename: item.filename.clone(),
            });
            report.skipped += 1;
            continue;
        }

        match download_episode(client, item, &target, reporter).await {
            Ok(_) => report.downloaded += 1,
            Err(e) => {
                reporter.report(ProgressEvent::DownloadFailed {
                    filename: item.filename.clone(),
                    error: e.to_string(),
                });
                report.failed_episodes.push((item.filename.clone(), e.to_string()));
            }
        }
    }

    Ok(report)
}

/// Archive every configured feed, strictly in config-file order.
///
/// Feed-scoped failures (fetch, parse, directory creation) are reported
/// and recorded, then the run moves on to the next feed rather than
/// aborting.
pub async fn archive_all<C: HttpClient>(
    client: &C,
    config: &Config,
    reporter: &SharedProgressReporter,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let root = &config.options.download_location;

    for feed in &config.feeds {
        match archive_feed(client, root, &feed.title, &feed.url, reporter).await {
            Ok(report) => {
                summary.downloaded += report.downloaded;
                summary.skipped += report.skipped;
                summary.failed_episodes.extend(report.failed_episodes);
            }
            Err(e) => {
                reporter.report(ProgressEvent::FeedFailed {
                    title: feed.title.clone(),
                    error: e.to_string(),
                });
                summary.failed_feeds.push((feed.title.clone(), e.to_string()));
            }
        }
    }

    reporter.report(ProgressEvent::RunCompleted {
        downloaded_count: summary.downloaded,
        skipped_count: summary.skipped,
        failed_count: summary.failed_episodes.len(),
        failed_feed_count: summary.failed_feeds.len(),
    });

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{HashMap, HashSet};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;
    use tempfile::tempdir;

    use crate::config::{FeedEntry, Options};
    use crate::error::FetchError;
    use crate::http::{ByteStream, HttpResponse};
    use crate::progress::{NoopReporter, ProgressReporter};

    const SAMPLE_FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Test Podcast</title>
    <item>
      <title>Episode 1</title>
      <enclosure url="https://example.com/ep1.mp3" type="audio/mpeg"/>
    </item>
    <item>
      <title>Episode 2</title>
    </item>
  </channel>
</rss>"#;

    #[derive(Default)]
    struct MockHttpClient {
        /// Feed URL -> XML; unknown URLs fail with a 502
        feeds: HashMap<String, String>,
        /// Enclosure URLs that answer 404
        failing_enclosures: HashSet<String>,
        /// Number of enclosure streams opened
        stream_requests: AtomicUsize,
    }

    impl MockHttpClient {
        fn with_feed(url: &str, xml: &str) -> Self {
            let mut client = Self::default();
            client.feeds.insert(url.to_string(), xml.to_string());
            client
        }
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn get_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
            match self.feeds.get(url) {
                Some(xml) => Ok(Bytes::from(xml.clone())),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 502,
                }),
            }
        }

        async fn get_stream(&self, url: &str) -> Result<HttpResponse, FetchError> {
            self.stream_requests.fetch_add(1, Ordering::SeqCst);

            let status = if self.failing_enclosures.contains(url) {
                404
            } else {
                200
            };
            let data = Bytes::from_static(b"fake audio");
            let len = data.len() as u64;

            let stream: ByteStream = Box::pin(futures::stream::once(async move { Ok(data) }));

            Ok(HttpResponse {
                status,
                content_length: Some(len),
                body: stream,
            })
        }
    }

    fn make_config(root: PathBuf, feeds: &[(&str, &str)]) -> Config {
        Config {
            options: Options {
                download_location: root,
            },
            feeds: feeds
                .iter()
                .map(|(title, url)| FeedEntry {
                    title: title.to_string(),
                    url: url.to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn archives_only_complete_items() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("archive");

        let client = MockHttpClient::with_feed("https://example.com/feed.xml", SAMPLE_FEED);
        let config = make_config(
            root.clone(),
            &[("Test Podcast", "https://example.com/feed.xml")],
        );

        let summary = archive_all(&client, &config, &NoopReporter::shared()).await;

        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.skipped, 0);
        assert!(summary.failed_feeds.is_empty());

        let podcast_dir = root.join("Test Podcast");
        let entries: Vec<_> = std::fs::read_dir(&podcast_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(podcast_dir.join("Episode_1.mp3").exists());
    }

    #[tokio::test]
    async fn rerun_performs_no_downloads() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("archive");

        let client = MockHttpClient::with_feed("https://example.com/feed.xml", SAMPLE_FEED);
        let config = make_config(
            root.clone(),
            &[("Test Podcast", "https://example.com/feed.xml")],
        );

        archive_all(&client, &config, &NoopReporter::shared()).await;
        assert_eq!(client.stream_requests.load(Ordering::SeqCst), 1);

        let summary = archive_all(&client, &config, &NoopReporter::shared()).await;

        assert_eq!(summary.downloaded, 0);
        assert_eq!(summary.skipped, 1);
        // The second run opened no enclosure streams at all
        assert_eq!(client.stream_requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn truncated_file_from_prior_run_is_not_retried() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("archive");

        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(root.join("Test Podcast")).unwrap();
        std::fs::write(root.join("Test Podcast").join("Episode_1.mp3"), b"").unwrap();

        let client = MockHttpClient::with_feed("https://example.com/feed.xml", SAMPLE_FEED);
        let config = make_config(
            root.clone(),
            &[("Test Podcast", "https://example.com/feed.xml")],
        );

        let summary = archive_all(&client, &config, &NoopReporter::shared()).await;

        assert_eq!(summary.downloaded, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(client.stream_requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_failure_is_feed_scoped() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("archive");

        // Only the second feed resolves
        let client = MockHttpClient::with_feed("https://example.com/good.xml", SAMPLE_FEED);
        let config = make_config(
            root.clone(),
            &[
                ("Broken Cast", "https://example.com/broken.xml"),
                ("Test Podcast", "https://example.com/good.xml"),
            ],
        );

        let summary = archive_all(&client, &config, &NoopReporter::shared()).await;

        assert_eq!(summary.failed_feeds.len(), 1);
        assert_eq!(summary.failed_feeds[0].0, "Broken Cast");
        // The failure did not stop the next feed from downloading
        assert_eq!(summary.downloaded, 1);
        assert!(root.join("Test Podcast").join("Episode_1.mp3").exists());
    }

    #[tokio::test]
    async fn unparseable_feed_is_feed_scoped() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("archive");

        let mut client = MockHttpClient::with_feed("https://example.com/good.xml", SAMPLE_FEED);
        client.feeds.insert(
            "https://example.com/broken.xml".to_string(),
            "<rss><channel><item></wrong>".to_string(),
        );
        let config = make_config(
            root.clone(),
            &[
                ("Broken Cast", "https://example.com/broken.xml"),
                ("Test Podcast", "https://example.com/good.xml"),
            ],
        );

        let summary = archive_all(&client, &config, &NoopReporter::shared()).await;

        assert_eq!(summary.failed_feeds.len(), 1);
        assert_eq!(summary.downloaded, 1);
    }

    #[tokio::test]
    async fn episode_failure_skips_and_continues() {
        let feed = r#"<rss><channel>
            <item>
              <title>Bad Episode</title>
              <enclosure url="https://example.com/bad.mp3"/>
            </item>
            <item>
              <title>Good Episode</title>
              <enclosure url="https://example.com/good.mp3"/>
            </item>
        </channel></rss>"#;

        let dir = tempdir().unwrap();
        let root = dir.path().join("archive");

        let mut client = MockHttpClient::with_feed("https://example.com/feed.xml", feed);
        client
            .failing_enclosures
            .insert("https://example.com/bad.mp3".to_string());
        let config = make_config(
            root.clone(),
            &[("Test Podcast", "https://example.com/feed.xml")],
        );

        let summary = archive_all(&client, &config, &NoopReporter::shared()).await;

        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.failed_episodes.len(), 1);
        assert_eq!(summary.failed_episodes[0].0, "Bad_Episode.mp3");
        assert!(root.join("Test Podcast").join("Good_Episode.mp3").exists());
    }

    #[tokio::test]
    async fn missing_root_parent_fails_every_feed() {
        let dir = tempdir().unwrap();
        // Two levels below the tempdir; single-level create cannot reach it
        let root = dir.path().join("missing").join("archive");

        let client = MockHttpClient::with_feed("https://example.com/feed.xml", SAMPLE_FEED);
        let config = make_config(
            root,
            &[("Test Podcast", "https://example.com/feed.xml")],
        );

        let summary = archive_all(&client, &config, &NoopReporter::shared()).await;

        assert_eq!(summary.downloaded, 0);
        assert_eq!(summary.failed_feeds.len(), 1);
    }

    #[tokio::test]
    async fn feeds_are_processed_in_config_order() {
        #[derive(Default)]
        struct RecordingReporter {
            started: Mutex<Vec<String>>,
        }

        impl ProgressReporter for RecordingReporter {
            fn report(&self, event: ProgressEvent) {
                if let ProgressEvent::FeedStarted { title, .. } = event {
                    self.started.lock().unwrap().push(title);
                }
            }
        }

        let dir = tempdir().unwrap();
        let root = dir.path().join("archive");

        let mut client = MockHttpClient::with_feed("https://example.com/b.xml", SAMPLE_FEED);
        client
            .feeds
            .insert("https://example.com/a.xml".to_string(), SAMPLE_FEED.to_string());

        let config = make_config(
            root,
            &[
                ("Zebra Cast", "https://example.com/b.xml"),
                ("Alpha Cast", "https://example.com/a.xml"),
            ],
        );

        let recorder = std::sync::Arc::new(RecordingReporter::default());
        let reporter: SharedProgressReporter = recorder.clone();

        archive_all(&client, &config, &reporter).await;

        let started = recorder.started.lock().unwrap();
        assert_eq!(*started, ["Zebra Cast", "Alpha Cast"]);
    }
}
