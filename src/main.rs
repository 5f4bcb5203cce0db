use backoffice::config::Config;
use backoffice::domain::ports::LedgerStoreRef;
use backoffice::infrastructure::in_memory::InMemoryLedgerStore;
use backoffice::interfaces::csv::seed_reader::load_seed_dir;
use backoffice::interfaces::http::{AppState, router};
use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "storage-rocksdb")]
fn open_store(config: &Config) -> Result<LedgerStoreRef> {
    use backoffice::infrastructure::rocksdb::RocksLedgerStore;

    match &config.db_path {
        Some(path) => {
            let store = RocksLedgerStore::open(path).into_diagnostic()?;
            tracing::info!(path = %path.display(), "using RocksDB ledger");
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryLedgerStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(_config: &Config) -> Result<LedgerStoreRef> {
    Ok(Arc::new(InMemoryLedgerStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,backoffice=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    let store = open_store(&config)?;

    if let Some(dir) = &config.seed_dir {
        load_seed_dir(store.as_ref(), dir)
            .await
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load seed from {}", dir.display()))?;
    }

    let app = router(AppState::new(store, config.retry_policy()));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, "listening");

    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}
