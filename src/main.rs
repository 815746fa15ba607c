use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use configuration::Settings;
use database::{PgStore, connect, run_migrations};
use engine::{SimulationLocks, SimulationProcessor, SimulationService, Sweeper, catalog};
use market_data::{
    AlphaVantageProvider, MarketDataService, ProviderChain, QuoteProvider, YahooProvider,
};
use web_server::{AppState, run_server};

/// The main entry point for the Meridian paper-trading backend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables (DATABASE_URL, provider keys) from .env.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = configuration::load()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => handle_serve(settings).await,
        Commands::Sweep => handle_sweep(settings).await,
        Commands::Backfill(args) => handle_backfill(settings, args).await,
        Commands::Seed => handle_seed().await,
    }
}

/// A paper-trading backend: strategy-driven simulations over live quotes.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API and the scheduled simulation sweep.
    Serve,
    /// Run one sweep over all active simulations, then exit.
    Sweep,
    /// Fetch and store historical bars for a symbol.
    Backfill(BackfillArgs),
    /// Seed the default strategy catalog (idempotent).
    Seed,
}

#[derive(Parser)]
struct BackfillArgs {
    /// The exchange ticker to download data for (e.g. "RELIANCE.NS").
    #[arg(long)]
    symbol: String,

    /// The bar interval, in provider-native form (e.g. "5m", "1d").
    #[arg(long, default_value = "1d")]
    interval: String,

    /// The history range, in provider-native form (e.g. "1mo", "1y").
    #[arg(long, default_value = "3mo")]
    range: String,
}

/// Everything the commands need, wired over the Postgres store.
struct Components {
    market_data: Arc<MarketDataService>,
    service: Arc<SimulationService>,
    processor: Arc<SimulationProcessor>,
    sweeper: Arc<Sweeper>,
    settings: Settings,
}

async fn build_components(settings: Settings) -> anyhow::Result<Components> {
    let pool = connect().await?;
    run_migrations(&pool).await?;
    let store = Arc::new(PgStore::new(pool));

    let timeout = Duration::from_secs(settings.providers.request_timeout_secs);
    let providers: Vec<Arc<dyn QuoteProvider>> = vec![
        Arc::new(YahooProvider::new(
            settings.providers.yahoo_base_url.clone(),
            timeout,
        )),
        Arc::new(AlphaVantageProvider::new(
            settings.providers.alpha_vantage_base_url.clone(),
            settings.providers.alpha_vantage_api_key.clone(),
            timeout,
        )),
    ];
    let market_data = Arc::new(MarketDataService::new(
        store.clone(),
        store.clone(),
        ProviderChain::new(providers),
    ));

    // One lock registry shared by the sweep and the on-demand entry points.
    let locks = SimulationLocks::new();
    let processor = Arc::new(SimulationProcessor::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        market_data.clone(),
        settings.trading.clone(),
        locks.clone(),
    ));
    let sweeper = Arc::new(Sweeper::new(
        processor.clone(),
        store.clone(),
        Duration::from_secs(settings.scheduler.sweep_interval_secs),
    ));
    let service = Arc::new(SimulationService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        market_data.clone(),
        settings.trading.clone(),
        locks,
    ));

    Ok(Components {
        market_data,
        service,
        processor,
        sweeper,
        settings,
    })
}

async fn handle_serve(settings: Settings) -> anyhow::Result<()> {
    let components = build_components(settings).await?;

    tokio::spawn(components.sweeper.clone().run());

    let addr: SocketAddr = format!(
        "{}:{}",
        components.settings.server.host, components.settings.server.port
    )
    .parse()?;
    run_server(
        addr,
        AppState {
            service: components.service,
            processor: components.processor,
            sweeper: components.sweeper,
        },
    )
    .await
}

async fn handle_sweep(settings: Settings) -> anyhow::Result<()> {
    let components = build_components(settings).await?;
    let report = components.sweeper.run_sweep().await;
    tracing::info!(
        processed = report.processed,
        traded = report.traded,
        failed = report.failed,
        "sweep finished"
    );
    Ok(())
}

async fn handle_backfill(settings: Settings, args: BackfillArgs) -> anyhow::Result<()> {
    let components = build_components(settings).await?;
    let bars = components
        .market_data
        .fetch_and_store_history(&args.symbol, &args.interval, &args.range)
        .await?;
    tracing::info!(
        symbol = %args.symbol,
        bars = bars.len(),
        "backfill complete"
    );
    Ok(())
}

async fn handle_seed() -> anyhow::Result<()> {
    let pool = connect().await?;
    run_migrations(&pool).await?;
    let store = PgStore::new(pool);
    let seeded = catalog::seed_default_strategies(&store).await?;
    tracing::info!(seeded, "strategy catalog ready");
    Ok(())
}
