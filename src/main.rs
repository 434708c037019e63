use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use nestegg::store::PlanStore;

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Single-household retirement plan service (income, expenses, savings, mortgage)"
)]
struct Args {
    /// Port for the HTTP API.
    #[arg(long, env = "NESTEGG_PORT", default_value_t = 8080)]
    port: u16,
    /// Path to the SQLite plan database; created on first run.
    #[arg(long, env = "NESTEGG_DB", default_value = "nestegg.sqlite")]
    db: PathBuf,
    /// Default log level when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let store = PlanStore::open(&args.db).await?;
    nestegg::api::run_http_server(args.port, store).await
}

fn init_logger(level: LevelFilter) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        // RUST_LOG not set; default to the requested level for this crate only.
        Err(_) => EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME"))),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
