use crate::application::retry::RetryPolicy;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Marketplace back-office API server.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "BACKOFFICE_BIND", default_value = "127.0.0.1:3001")]
    pub bind: SocketAddr,

    /// Directory holding profiles.csv, contracts.csv and jobs.csv to load at startup
    #[arg(long, env = "BACKOFFICE_SEED_DIR")]
    pub seed_dir: Option<PathBuf>,

    /// Attempts a payment or deposit gets when the ledger reports a write conflict
    #[arg(long, env = "BACKOFFICE_SETTLEMENT_ATTEMPTS", default_value_t = 3)]
    pub settlement_attempts: u32,

    /// Initial backoff between conflicting attempts, doubled each retry
    #[arg(long, env = "BACKOFFICE_RETRY_BACKOFF_MS", default_value_t = 25)]
    pub retry_backoff_ms: u64,

    /// Path to persistent database. If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long, env = "BACKOFFICE_DB_PATH")]
    pub db_path: Option<PathBuf>,
}

impl Config {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.settlement_attempts,
            Duration::from_millis(self.retry_backoff_ms),
        )
    }
}
