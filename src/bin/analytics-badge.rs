use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use analytics_badge::config::proc_loader::file_to_config;
use analytics_badge::server;
use analytics_badge::server::server::AppState;
use analytics_badge::store::{FastCache, MemoryFastCache};
use analytics_badge::utils::logging;
use analytics_badge::utils::logging::LogLevel;
use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "analytics-badge.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
}

const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = file_to_config(Path::new(&args.config)).await?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Prepare stores
    // -------------------------------

    let memory_cache = MemoryFastCache::new();
    let fast_cache: Arc<dyn FastCache> = Arc::new(memory_cache.clone());
    let store = server::server::open_store(&service_config).await?;

    // -------------------------------
    // 3. Expired fast cache entries cleanup worker
    // -------------------------------

    let purge = tokio::spawn(async move {
        loop {
            tokio::time::sleep(CACHE_PURGE_INTERVAL).await;
            let purged = memory_cache.purge_expired().await;
            debug!("purged {} expired cache entries", purged);
        }
    });

    // -------------------------------
    // 4. Start http server
    // -------------------------------

    let state = AppState::build(&service_config, fast_cache, store).await?;
    let http_server = server::server::start(state);

    info!("Service starting...");
    tokio::select! {
        result = http_server => result?,
        _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
    }
    purge.abort();

    Ok(())
}
