mod status;
mod watch;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dining-cli")]
#[command(about = "Live dining hall status from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every dining hall once and print the result
    Status {
        /// Print the raw aggregate as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Poll a running status server and keep a merged board up to date
    Watch {
        /// Base URL of the status server
        #[arg(long, env = "DINING_API_URL", default_value = "http://localhost:3001")]
        api_url: String,
        /// Seconds between polls
        #[arg(long, default_value_t = 300)]
        interval_secs: u64,
        /// Poll once, print the board, and exit
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = dining_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Status { json } => status::run_status(&config, json).await,
        Commands::Watch {
            api_url,
            interval_secs,
            once,
        } => watch::run_watch(&api_url, interval_secs, once).await,
    }
}
