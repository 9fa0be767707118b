//! SUITER feed CLI
//!
//! Terminal front end for the feed client. For the same-origin server, use
//! `suiter-proxy`.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use suiter::{
    error::{AppError, Result},
    models::Config,
    pipeline::{FeedController, RefreshOutcome, ToastKind},
    services::MockSource,
    view,
};

/// SUITER - resilient feed client
#[derive(Parser, Debug)]
#[command(name = "suiter", version, about = "SUITER feed client")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load posts and rankings once and print the feed
    Feed {
        /// Also print the debug log
        #[arg(long)]
        debug: bool,
    },

    /// Keep refreshing and reprint the feed until Ctrl+C
    Watch,

    /// Submit a new post
    Post {
        /// Post text
        content: String,

        /// Author name (default: anonymous)
        #[arg(short, long, default_value = "")]
        author: String,
    },

    /// Validate configuration
    Validate,

    /// Show the effective endpoints and refresh settings
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    }
    .apply_env();
    init_logging(cli.verbose, &config.logging.level);

    match cli.command {
        Command::Feed { debug } => {
            let controller = FeedController::from_config(&config)?;
            let outcome = controller.refresh().await;
            log::debug!("Refresh outcome: {:?}", outcome);

            print!("{}", view::render(&controller.state(), Utc::now()));
            if debug {
                println!("\n== Debug ==");
                for entry in controller.debug_log().entries() {
                    println!("{} {}", entry.level.as_str(), entry);
                }
            }
        }

        Command::Watch => {
            let controller = FeedController::from_config(&config)?;
            controller.start();

            let mut ticker = tokio::time::interval(Duration::from_secs(
                config.refresh.interval_secs.max(1),
            ));
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = ticker.tick() => {
                        // Clear screen and home the cursor.
                        print!("\x1B[2J\x1B[H");
                        print!("{}", view::render(&controller.state(), Utc::now()));
                    }
                }
            }

            controller.stop();
            log::info!("Stopped watching");
        }

        Command::Post { content, author } => {
            let controller = FeedController::from_config(&config)?;
            let toast = controller.submit_post(&author, &content).await;
            match toast.kind {
                ToastKind::Error => {
                    log::error!("{}", toast.message);
                    return Err(AppError::validation(toast.message));
                }
                _ => log::info!("✓ {}", toast.message),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Info => {
            let candidates = config.api.candidates()?;
            log::info!("Config file: {}", cli.config.display());
            log::info!("Origin: {}", candidates.origin());
            for (i, endpoint) in candidates.endpoints().iter().enumerate() {
                log::info!("  {}. {}", i + 1, endpoint);
            }
            match MockSource::from_config(config.mock.dir.as_deref(), candidates.origin()) {
                MockSource::Directory(dir) => log::info!("Mock snapshot: {}", dir.display()),
                MockSource::Origin(url) => log::info!("Mock snapshot: {}mock/", url),
            }
            log::info!(
                "Refresh: every {}s, join {:?}",
                config.refresh.interval_secs,
                config.refresh.join
            );

            let controller = FeedController::from_config(&config)?;
            if let RefreshOutcome::Failed { missing } = controller.refresh().await {
                log::warn!("Backend unreachable for: {:?}", missing);
            }
        }
    }

    Ok(())
}
