//! lazyhcloud - terminal dashboard for Hetzner Cloud resources

use anyhow::Context;
use clap::Parser;
use lazyhcloud_config::Config;
use lazyhcloud_provider::DEFAULT_ENDPOINT;
use lazyhcloud_tui::RunOptions;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "lazyhcloud")]
#[command(author, version, about = "Terminal dashboard for Hetzner Cloud resources", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/lazyhcloud/config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Cloud API base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Write logs to this file while the dashboard is running
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Log filter from `RUST_LOG`, falling back to the verbosity flag
pub fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = log_filter(cli.verbose);

    match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        // Only reaches stderr before and after the TUI owns the terminal
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .init();
        }
    }

    Ok(())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(&cli)?;

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    tracing::debug!("Using config at {:?}", config_path);

    lazyhcloud_tui::run(RunOptions {
        config_path: Some(config_path),
        endpoint: cli.endpoint,
        log_to_file: cli.log_file.is_some(),
    })
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["lazyhcloud"]).unwrap();
        assert_eq!(cli.config, None);
        assert_eq!(cli.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cli.log_file, None);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "lazyhcloud",
            "--config",
            "/tmp/lazyhcloud.toml",
            "--endpoint",
            "http://localhost:8080/v1",
            "--log-file",
            "/tmp/lazyhcloud.log",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/lazyhcloud.toml")));
        assert_eq!(cli.endpoint, "http://localhost:8080/v1");
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/lazyhcloud.log")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_subcommands_rejected() {
        assert!(Cli::try_parse_from(["lazyhcloud", "list"]).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
