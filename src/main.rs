//! rapidok - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use rapidok::{
    cli::{Args, RunMode},
    config::{sanitize_username, validate_config, Config},
    download::{download_profile, read_links, run_batch, RateLimiter},
    error::{exit_codes, Error, Result},
    extractor::YtDlp,
    fs::ErrorLog,
    output::{
        print_banner, print_batch_config, print_profile_config, ConsoleReporter, ProgressEvent,
        Reporter,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Extractor(_) | Error::ProfileEmpty(_) => {
                    ExitCode::from(exit_codes::EXTRACTOR_ERROR as u8)
                }
                Error::Download(_) | Error::Http(_) | Error::InvalidUrl(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        tracing::debug!("No configuration file at {}, using defaults", args.config.display());
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    let engine = YtDlp::locate();
    let reporter = ConsoleReporter::new();
    let limiter = RateLimiter::from_config(&config.rate_limit)?;
    let error_log = ErrorLog::new(ErrorLog::default_path());

    if config.options.workers > 5 {
        reporter.event(ProgressEvent::Warning(format!(
            "{} workers is above the recommended maximum of 5; expect rate limiting",
            config.options.workers
        )));
    }
    if !config.rate_limit.enabled {
        reporter.event(ProgressEvent::Warning(
            "Rate limiting disabled; risk of IP blocking".to_string(),
        ));
    }

    match args.run_mode() {
        RunMode::Profile(raw_username) => {
            let username = sanitize_username(&raw_username)?;
            print_profile_config(
                &username,
                &format!("https://www.tiktok.com/@{}", username),
                &config.options.output_dir,
                &config.options.content_type.to_string(),
                config.options.use_archive,
                config.options.max_downloads,
            );

            download_profile(&engine, &config, &reporter, &error_log, &limiter, &username)
                .await?;
        }
        RunMode::Links(links_file) => {
            let urls = read_links(&links_file)?;
            if urls.is_empty() {
                return Err(Error::Config(format!(
                    "No valid links found in {}",
                    links_file.display()
                )));
            }
            print_batch_config(
                &links_file,
                urls.len(),
                config.options.workers,
                &config.options.output_dir,
            );

            let summary =
                run_batch(&engine, &config, &reporter, &error_log, &limiter, &urls).await?;

            if summary.completed == 0 && summary.skipped == 0 {
                return Err(Error::Download(format!(
                    "All {} downloads failed; see {}",
                    summary.failed,
                    ErrorLog::default_path().display()
                )));
            }
        }
    }

    Ok(())
}
