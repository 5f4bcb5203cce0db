#![allow(dead_code)]

use async_trait::async_trait;
use backoffice::domain::auth::AuthContext;
use backoffice::domain::contract::{Contract, ContractId, ContractStatus};
use backoffice::domain::job::{Job, JobId};
use backoffice::domain::money::{Amount, Balance};
use backoffice::domain::ports::{LedgerStore, WriteSet};
use backoffice::domain::profile::{Profile, ProfileId, ProfileKind};
use backoffice::domain::query::{ContractQuery, JobQuery};
use backoffice::error::{LedgerError, Result};
use backoffice::infrastructure::in_memory::InMemoryLedgerStore;
use backoffice::interfaces::csv::seed_reader::load_seed_dir;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

pub const DEMO_SEED: &str = "demos/seed";

pub async fn demo_store() -> Arc<InMemoryLedgerStore> {
    let store = Arc::new(InMemoryLedgerStore::new());
    load_seed_dir(store.as_ref(), Path::new(DEMO_SEED))
        .await
        .expect("demo seed should load");
    store
}

pub fn client(id: u32, balance: Decimal) -> Profile {
    Profile {
        id: ProfileId(id),
        first_name: format!("Client{id}"),
        last_name: "Test".to_string(),
        profession: "Buyer".to_string(),
        balance: Balance::new(balance).unwrap(),
        kind: ProfileKind::Client,
    }
}

pub fn contractor(id: u32, profession: &str, balance: Decimal) -> Profile {
    Profile {
        id: ProfileId(id),
        first_name: format!("Contractor{id}"),
        last_name: "Test".to_string(),
        profession: profession.to_string(),
        balance: Balance::new(balance).unwrap(),
        kind: ProfileKind::Contractor,
    }
}

pub fn contract(id: u32, client: u32, contractor: u32) -> Contract {
    Contract {
        id: ContractId(id),
        terms: "terms".to_string(),
        status: ContractStatus::InProgress,
        client_id: ProfileId(client),
        contractor_id: ProfileId(contractor),
    }
}

pub fn unpaid_job(id: u32, contract: u32, price: Decimal) -> Job {
    Job::unpaid(
        JobId(id),
        ContractId(contract),
        "work".to_string(),
        Amount::new(price).unwrap(),
    )
}

pub fn paid_job(id: u32, contract: u32, price: Decimal, at: DateTime<Utc>) -> Job {
    let mut job = unpaid_job(id, contract, price);
    job.mark_paid(at).unwrap();
    job
}

pub async fn auth(store: &dyn LedgerStore, id: u32) -> AuthContext {
    AuthContext::new(store.profile(ProfileId(id)).await.unwrap().unwrap())
}

pub async fn balance(store: &dyn LedgerStore, id: u32) -> Decimal {
    store.profile(ProfileId(id)).await.unwrap().unwrap().balance.value()
}

/// Wraps an in-memory ledger to inject faults the real backends never produce on demand.
pub struct FaultyStore {
    inner: InMemoryLedgerStore,
    commit_error: Option<fn() -> LedgerError>,
    self_dealing: bool,
    commits: AtomicU32,
}

impl FaultyStore {
    pub fn new(inner: InMemoryLedgerStore) -> Self {
        Self {
            inner,
            commit_error: None,
            self_dealing: false,
            commits: AtomicU32::new(0),
        }
    }

    /// Every commit fails with the error `make` builds.
    pub fn failing_commits(mut self, make: fn() -> LedgerError) -> Self {
        self.commit_error = Some(make);
        self
    }

    /// Contracts come back with the client as their own contractor.
    pub fn self_dealing(mut self) -> Self {
        self.self_dealing = true;
        self
    }

    pub fn commits(&self) -> u32 {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerStore for FaultyStore {
    async fn profile(&self, id: ProfileId) -> Result<Option<Profile>> {
        self.inner.profile(id).await
    }

    async fn profiles(&self, ids: &[ProfileId]) -> Result<Vec<Profile>> {
        self.inner.profiles(ids).await
    }

    async fn contract(&self, id: ContractId) -> Result<Option<Contract>> {
        let contract = self.inner.contract(id).await?;
        if !self.self_dealing {
            return Ok(contract);
        }
        Ok(contract.map(|c| Contract {
            contractor_id: c.client_id,
            ..c
        }))
    }

    async fn contracts(&self, query: &ContractQuery) -> Result<Vec<Contract>> {
        self.inner.contracts(query).await
    }

    async fn job(&self, id: JobId) -> Result<Option<Job>> {
        self.inner.job(id).await
    }

    async fn jobs(&self, query: &JobQuery) -> Result<Vec<Job>> {
        self.inner.jobs(query).await
    }

    async fn insert_profile(&self, profile: Profile) -> Result<()> {
        self.inner.insert_profile(profile).await
    }

    async fn insert_contract(&self, contract: Contract) -> Result<()> {
        self.inner.insert_contract(contract).await
    }

    async fn insert_job(&self, job: Job) -> Result<()> {
        self.inner.insert_job(job).await
    }

    async fn commit(&self, writes: WriteSet) -> Result<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        match self.commit_error {
            Some(make) => Err(make()),
            None => self.inner.commit(writes).await,
        }
    }
}
