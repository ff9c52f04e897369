mod config;
mod main_lib;
mod scheduler;

use config::Config;
use main_lib::{build_refresher, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(&config);
    for entry in &config.rejected_stocks {
        tracing::warn!("Ignoring invalid QW_STOCKS entry: {}", entry);
    }
    if config.stocks.is_empty() {
        anyhow::bail!("QW_STOCKS has no valid instrument codes");
    }

    let refresher = build_refresher(&config);
    scheduler::run(&refresher, &config).await
}
