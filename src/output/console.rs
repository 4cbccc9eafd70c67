//! Console rendering of progress events.

use std::path::Path;
use std::sync::Mutex;

use console::style;
use indicatif::ProgressBar;

use crate::output::progress::create_spinner;
use crate::output::reporter::{ProgressEvent, Reporter};

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     rapidok                                           ║
║     TikTok content downloader                         ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print the profile download configuration summary.
#[allow(clippy::too_many_arguments)]
pub fn print_profile_config(
    username: &str,
    profile_url: &str,
    output_dir: &Path,
    content_type: &str,
    archive_enabled: bool,
    max_downloads: Option<usize>,
) {
    println!();
    println!("{}", style("Profile Download Configuration:").bold());
    println!("  Profile:      @{}", username);
    println!("  URL:          {}", profile_url);
    println!("  Output:       {}", output_dir.display());
    println!("  Content Type: {}", content_type);
    println!(
        "  Archive:      {}",
        if archive_enabled { "Enabled" } else { "Disabled" }
    );
    if let Some(max) = max_downloads {
        println!("  Max Downloads: {}", max);
    }
    println!();
}

/// Print the batch download configuration summary.
pub fn print_batch_config(links_file: &Path, total_urls: usize, workers: usize, output_dir: &Path) {
    println!();
    println!("{}", style("Batch Download Configuration:").bold());
    println!("  Links File: {}", links_file.display());
    println!("  Total URLs: {}", total_urls);
    println!("  Workers:    {}", workers);
    println!("  Output:     {}", output_dir.display());
    println!();
}

/// Terminal [`Reporter`] implementation.
#[derive(Default)]
pub struct ConsoleReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish_spinner(&self) {
        if let Some(spinner) = self.spinner.lock().unwrap().take() {
            spinner.finish_and_clear();
        }
    }
}

impl Reporter for ConsoleReporter {
    fn event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Info(message) => {
                println!("{} {}", style("INFO").cyan().bold(), message);
            }
            ProgressEvent::Warning(message) => {
                self.finish_spinner();
                println!("{} {}", style("WARN").yellow().bold(), message);
            }
            ProgressEvent::Error(message) => {
                self.finish_spinner();
                eprintln!("{} {}", style("ERROR").red().bold(), message);
            }
            ProgressEvent::DiscoveryStarted { username } => {
                let spinner = create_spinner(&format!("Fetching profile @{}...", username));
                *self.spinner.lock().unwrap() = Some(spinner);
            }
            ProgressEvent::Discovered {
                username,
                total_posts,
            } => {
                self.finish_spinner();
                println!(
                    "{} Found {} posts in @{}'s profile",
                    style("✓").green(),
                    total_posts,
                    username
                );
            }
            ProgressEvent::MetadataSaved { count, path } => {
                println!(
                    "{} Saved metadata for {} posts to {}",
                    style("✓").green(),
                    count,
                    path.display()
                );
            }
            ProgressEvent::PostCompleted {
                index,
                total,
                title,
                post_type,
            } => {
                println!(
                    "  [{}/{}] {} Downloaded: {}... ({})",
                    index,
                    total,
                    style("✓").green(),
                    title,
                    post_type
                );
            }
            ProgressEvent::PostSkipped {
                index,
                total,
                title,
            } => {
                println!(
                    "  [{}/{}] {} Skipping: {}... (already exists)",
                    index,
                    total,
                    style("⊘").yellow(),
                    title
                );
            }
            ProgressEvent::PostFailed {
                index,
                total,
                id,
                error,
            } => {
                println!(
                    "  [{}/{}] {} Error downloading {}: {}",
                    index,
                    total,
                    style("✗").red(),
                    id,
                    error
                );
            }
            ProgressEvent::UrlCompleted {
                username,
                id,
                title,
            } => {
                println!(
                    "{} Downloaded: {}/{} - {}",
                    style("✓").green(),
                    username,
                    id,
                    title
                );
            }
            ProgressEvent::UrlSkipped { username, id } => {
                println!(
                    "{} Skipping: {}/{} (already exists)",
                    style("⊘").yellow(),
                    username,
                    id
                );
            }
            ProgressEvent::UrlFailed { url, error } => {
                println!("{} Error: {} - {}", style("✗").red(), url, error);
            }
            ProgressEvent::ProfileSummary {
                username,
                downloaded,
                enqueued,
                content_type,
                output_dir,
            } => {
                self.finish_spinner();
                println!();
                println!("{}", style("Download Summary:").bold());
                println!("  Username:         @{}", username);
                println!("  Posts Downloaded: {}/{}", downloaded, enqueued);
                println!("  Content Type:     {}", content_type);
                println!("  Output Directory: {}", output_dir.display());
                println!();
            }
            ProgressEvent::BatchSummary {
                completed,
                skipped,
                failed,
                total,
            } => {
                println!();
                println!("{}", style("═".repeat(50)).dim());
                println!("{}", style("Batch Download Complete:").bold());
                println!("  Downloaded: {}", style(completed).green());
                println!("  Skipped:    {}", style(skipped).yellow());
                if failed > 0 {
                    println!("  Failed:     {}", style(failed).red());
                }
                println!("  Total:      {}", total);
                println!("{}", style("═".repeat(50)).dim());
            }
        }
    }
}
