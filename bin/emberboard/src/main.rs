//! # Emberboard Binary
//!
//! Hosts the ranking sweep timer over the configured database. The engines
//! themselves (threads, likes, post writes) are a library surface consumed
//! by the HTTP layer; nothing here triggers them.

use std::sync::Arc;

use eb_configs::Settings;
use eb_core::traits::PostRepo;
use eb_services::{spawn_sweeper, RankingService};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "db-sqlite")]
use eb_db_sqlite::SqliteStore;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing(settings.log.json);

    #[cfg(feature = "db-sqlite")]
    let store = SqliteStore::new(&settings.database.url, settings.database.max_connections).await?;

    let posts: Arc<dyn PostRepo> = Arc::new(store);
    let ranking = Arc::new(RankingService::new(posts));

    let sweeper = spawn_sweeper(ranking, settings.ranking.sweep_interval());
    tracing::info!(
        interval_secs = settings.ranking.sweep_interval_secs,
        "🔥 emberboard hot-score sweeper running"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    sweeper.abort();
    Ok(())
}
