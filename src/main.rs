use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};

use podvault::{
    NoopReporter, ProgressEvent, ProgressReporter, ReqwestClient, SharedProgressReporter,
    archive_all, config,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Archive podcast episodes from configured RSS feeds
#[derive(Parser, Debug)]
#[command(name = "podvault")]
#[command(about = "Archive podcast episodes from RSS feeds")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.podvault.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an example config file
    CreateConfig,

    /// Download new episodes for every configured feed
    Download {
        /// Quiet mode - suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
}

/// Progress reporter using indicatif for terminal output
struct IndicatifReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl IndicatifReporter {
    fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn start_bar(&self, content_length: Option<u64>, message: String) {
        let bar = match content_length {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template(&format!(
                            "  {DOWNLOAD}[{{bar:30.cyan/blue}}] {{bytes}}/{{total_bytes}} {{wide_msg}}"
                        ))
                        .unwrap()
                        .progress_chars("█▓░"),
                );
                bar
            }
            None => {
                let bar = ProgressBar::no_length();
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template(&format!("  {DOWNLOAD}{{bytes}} {{wide_msg}}"))
                        .unwrap(),
                );
                bar
            }
        };
        bar.set_message(message);
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn finish_bar(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FeedStarted { title, .. } => {
                println!("\n{HEADPHONES}Working on {}", title.bold().green());
            }

            ProgressEvent::FeedParsed { episodes, .. } => {
                println!(
                    "  {SEARCH}{} episodes in feed",
                    episodes.to_string().cyan()
                );
            }

            ProgressEvent::FeedFailed { title, error } => {
                println!("  {FAILURE}{} - {}", title.yellow(), error.red());
            }

            ProgressEvent::EpisodeSkipped { .. } => {}

            ProgressEvent::DownloadStarting {
                filename,
                content_length,
            } => {
                self.start_bar(content_length, truncate_title(&filename, 40));
            }

            ProgressEvent::DownloadProgress {
                bytes_downloaded, ..
            } => {
                if let Some(bar) = self.bar.lock().unwrap().as_ref() {
                    bar.set_position(bytes_downloaded);
                }
            }

            ProgressEvent::DownloadCompleted { filename, .. } => {
                self.finish_bar();
                println!("  {SUCCESS}{}", truncate_title(&filename, 60).green());
            }

            ProgressEvent::DownloadFailed { filename, error } => {
                self.finish_bar();
                println!(
                    "  {FAILURE}{} - {}",
                    truncate_title(&filename, 40).red(),
                    error.red()
                );
            }

            ProgressEvent::RunCompleted {
                downloaded_count,
                skipped_count,
                failed_count,
                failed_feed_count,
            } => {
                println!(
                    "\n{PARTY}{} {} downloaded, {} skipped, {} failed",
                    "Done:".bold().green(),
                    downloaded_count.to_string().green().bold(),
                    skipped_count.to_string().yellow(),
                    if failed_count > 0 {
                        failed_count.to_string().red().bold()
                    } else {
                        failed_count.to_string().green()
                    }
                );
                if failed_feed_count > 0 {
                    println!(
                        "{FAILURE}{} feeds could not be read",
                        failed_feed_count.to_string().red().bold()
                    );
                }
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.len() <= max_len {
        title.to_string()
    } else {
        format!("{}...", &title[..max_len.saturating_sub(3)])
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_path()?,
    };

    match cli.command {
        Command::CreateConfig => create_config(&config_path),
        Command::Download { quiet } => download(&config_path, quiet).await,
    }
}

fn create_config(path: &Path) -> Result<()> {
    if let Err(e) = config::write_example(path) {
        eprintln!("{FAILURE}{}", e.to_string().red());
        std::process::exit(1);
    }

    println!(
        "{SUCCESS}Created {}",
        path.display().to_string().cyan()
    );
    println!(
        "Now add your feeds to it and run {}",
        "podvault download".bold()
    );

    Ok(())
}

async fn download(config_path: &Path, quiet: bool) -> Result<()> {
    let config = match config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{FAILURE}{}", e.to_string().red());
            std::process::exit(1);
        }
    };

    if !quiet {
        println!(
            "\n{}{} {}",
            MICROPHONE,
            "podvault".bold().magenta(),
            "- Podcast Archiver".dimmed()
        );
    }

    let client = ReqwestClient::new();

    let reporter: SharedProgressReporter = if quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    let summary = archive_all(&client, &config, &reporter).await;

    if !quiet && !summary.failed_feeds.is_empty() {
        println!("\n{}", "Failed feeds:".red().bold());
        for (title, error) in &summary.failed_feeds {
            println!("  {CROSS}{} - {}", title.yellow(), error.dimmed());
        }
    }

    if !quiet {
        println!(
            "\n{FOLDER}Archive: {}\n",
            config
                .options
                .download_location
                .display()
                .to_string()
                .cyan()
        );
    }

    Ok(())
}
