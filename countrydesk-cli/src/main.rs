use clap::Parser;
use countrydesk::config::{self, Config, SeedPolicy};
use countrydesk::session::{Outcome, Session};
use countrydesk::utils::{StdinSource, Terminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "countrydesk", about = "Console record manager for country data", version)]
struct Args {
    /// CSV file to load at startup and save to
    #[arg(short, long, env = "COUNTRYDESK_DATA", default_value = config::DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// What to do when the data file doesn't exist (ask, always, never)
    #[arg(long, default_value_t = SeedPolicy::Ask)]
    seed: SeedPolicy,

    /// Log level for countrydesk events. Overrides RUST_LOG
    #[arg(long)]
    log_level: Option<tracing::Level>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = match args.log_level {
        Some(level) => EnvFilter::try_new(format!(
            "countrydesk={}",
            level.as_str().to_ascii_lowercase()
        ))?,
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config::DEFAULT_LOG_DIRECTIVE))?,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    println!("------------------------------------------------------------");
    println!("                        COUNTRYDESK                         ");
    println!("               Country records in plain CSV                 ");
    println!("                    VERSION: {}                          ", env!("CARGO_PKG_VERSION"));
    println!("------------------------------------------------------------");

    let config = Config::default()
        .with_data_path(args.data)
        .with_seed(args.seed);
    tracing::debug!(path = %config.data_path.display(), seed = %config.seed, "Starting session");

    let terminal = Terminal::new(StdinSource::spawn());
    let mut session = match Session::open(terminal, config).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(());
        }
    };

    match session.run().await {
        Outcome::Exited { saved } => tracing::info!(saved, "Session closed"),
        Outcome::Stopped { cause, saved } => tracing::info!(%cause, saved, "Session stopped"),
    }
    Ok(())
}
