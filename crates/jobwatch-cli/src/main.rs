use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod inspect;
mod monitor;
mod run;
mod setup;
mod signal;
mod watch;

#[derive(Debug, Parser)]
#[command(name = "jobwatch")]
#[command(about = "Watches career pages and emails a digest of new job postings")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check every enabled site once and send a digest if anything is new
    Run {
        /// Comma-separated site names; overrides `JOBWATCH_ENABLED_SITES`
        #[arg(long, value_delimiter = ',')]
        sites: Vec<String>,
        /// Print the digest instead of emailing it and leave baselines untouched
        #[arg(long)]
        dry_run: bool,
    },
    /// Run immediately, then again on a fixed interval until interrupted
    Watch {
        /// Minutes between runs; overrides `JOBWATCH_INTERVAL_MINUTES`
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_minutes: Option<u64>,
        /// Comma-separated site names; overrides `JOBWATCH_ENABLED_SITES`
        #[arg(long, value_delimiter = ',')]
        sites: Vec<String>,
        /// Print digests instead of emailing them and leave baselines untouched
        #[arg(long)]
        dry_run: bool,
    },
    /// List configured sites and whether each is enabled
    Sites,
    /// Inspect or reset stored baselines
    Baseline {
        #[command(subcommand)]
        command: BaselineCommands,
    },
}

#[derive(Debug, Subcommand)]
enum BaselineCommands {
    /// Print the titles remembered for a site
    Show {
        /// Site name as written in the sites file
        site: String,
    },
    /// Forget a site's titles so its next run reports everything as new
    Clear {
        /// Site name as written in the sites file
        site: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = jobwatch_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Run { sites, dry_run }) => run::run_once(&config, &sites, dry_run).await?,
        Some(Commands::Watch {
            interval_minutes,
            sites,
            dry_run,
        }) => {
            let minutes = interval_minutes.unwrap_or(config.interval_minutes);
            let monitor = setup::build_monitor(&config, &sites, dry_run)?;
            watch::watch(monitor, watch_interval(minutes)).await?;
        }
        Some(Commands::Sites) => inspect::list_sites(&config)?,
        Some(Commands::Baseline {
            command: BaselineCommands::Show { site },
        }) => inspect::show_baseline(&config, &site).await?,
        Some(Commands::Baseline {
            command: BaselineCommands::Clear { site },
        }) => inspect::clear_baseline(&config, &site).await?,
        None => Cli::command().print_help()?,
    }

    Ok(())
}

/// Converts a minute count to a `Duration`, saturating instead of overflowing.
fn watch_interval(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}
