use crate::domain::contract::{Contract, ContractId};
use crate::domain::job::{Job, JobId};
use crate::domain::ports::{LedgerStore, WriteSet};
use crate::domain::profile::{Profile, ProfileId};
use crate::domain::query::{ContractQuery, JobQuery};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const CF_PROFILES: &str = "profiles";
pub const CF_CONTRACTS: &str = "contracts";
pub const CF_JOBS: &str = "jobs";

/// A persistent ledger backed by RocksDB.
///
/// Each entity kind lives in its own column family, keyed by the big-endian
/// id with a JSON value. Commits are serialized through `commit_lock`, then
/// re-validated against current state and written as one `WriteBatch`.
#[derive(Clone)]
pub struct RocksLedgerStore {
    db: Arc<DB>,
    commit_lock: Arc<Mutex<()>>,
}

impl RocksLedgerStore {
    /// Opens or creates a RocksDB ledger at `path`, creating missing column families.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let families = [CF_PROFILES, CF_CONTRACTS, CF_JOBS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, families)?;

        Ok(Self {
            db: Arc::new(db),
            commit_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            LedgerError::Storage(Box::new(std::io::Error::other(format!(
                "column family {name} not found"
            ))))
        })
    }

    fn read<T: DeserializeOwned>(&self, family: &str, id: u32) -> Result<Option<T>> {
        let cf = self.cf(family)?;
        match self.db.get_pinned_cf(cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, family: &str, mut keep: impl FnMut(&T) -> bool) -> Result<Vec<T>> {
        let cf = self.cf(family)?;
        let mut out = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let record: T = serde_json::from_slice(&value)?;
            if keep(&record) {
                out.push(record);
            }
        }
        Ok(out)
    }

    fn insert_new<T: Serialize>(&self, family: &str, id: u32, record: &T) -> Result<()> {
        let cf = self.cf(family)?;
        if self.db.get_pinned_cf(cf, id.to_be_bytes())?.is_some() {
            return Err(LedgerError::Validation(format!(
                "{family} record {id} already exists"
            )));
        }
        self.db.put_cf(cf, id.to_be_bytes(), serde_json::to_vec(record)?)?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for RocksLedgerStore {
    async fn profile(&self, id: ProfileId) -> Result<Option<Profile>> {
        self.read(CF_PROFILES, id.0)
    }

    async fn profiles(&self, ids: &[ProfileId]) -> Result<Vec<Profile>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(profile) = self.read(CF_PROFILES, id.0)? {
                out.push(profile);
            }
        }
        Ok(out)
    }

    async fn contract(&self, id: ContractId) -> Result<Option<Contract>> {
        self.read(CF_CONTRACTS, id.0)
    }

    async fn contracts(&self, query: &ContractQuery) -> Result<Vec<Contract>> {
        self.scan(CF_CONTRACTS, |c| query.matches(c))
    }

    async fn job(&self, id: JobId) -> Result<Option<Job>> {
        self.read(CF_JOBS, id.0)
    }

    async fn jobs(&self, query: &JobQuery) -> Result<Vec<Job>> {
        self.scan(CF_JOBS, |j| query.matches(j))
    }

    async fn insert_profile(&self, profile: Profile) -> Result<()> {
        self.insert_new(CF_PROFILES, profile.id.0, &profile)
    }

    async fn insert_contract(&self, contract: Contract) -> Result<()> {
        contract.validate()?;
        self.insert_new(CF_CONTRACTS, contract.id.0, &contract)
    }

    async fn insert_job(&self, job: Job) -> Result<()> {
        self.insert_new(CF_JOBS, job.id.0, &job)
    }

    async fn commit(&self, writes: WriteSet) -> Result<()> {
        writes.ensure_distinct()?;
        let _guard = self.commit_lock.lock().await;
        let mut batch = WriteBatch::default();

        let profiles = self.cf(CF_PROFILES)?;
        for change in &writes.balances {
            let mut profile: Profile = self.read(CF_PROFILES, change.profile.0)?.ok_or_else(|| {
                LedgerError::Conflict(format!("profile {} disappeared", change.profile))
            })?;
            if profile.balance != change.expected {
                return Err(LedgerError::Conflict(format!(
                    "balance of profile {} changed concurrently",
                    change.profile
                )));
            }
            profile.balance = change.updated;
            batch.put_cf(profiles, change.profile.0.to_be_bytes(), serde_json::to_vec(&profile)?);
        }

        let jobs = self.cf(CF_JOBS)?;
        for payment in &writes.payments {
            let mut job: Job = self
                .read(CF_JOBS, payment.job.0)?
                .ok_or_else(|| LedgerError::Conflict(format!("job {} disappeared", payment.job)))?;
            job.mark_paid(payment.paid_at)
                .map_err(|_| LedgerError::Conflict(format!("job {} was paid concurrently", payment.job)))?;
            batch.put_cf(jobs, payment.job.0.to_be_bytes(), serde_json::to_vec(&job)?);
        }

        self.db.write(batch)?;
        Ok(())
    }
}
