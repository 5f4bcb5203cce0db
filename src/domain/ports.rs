use super::contract::{Contract, ContractId};
use super::job::{Job, JobId};
use super::money::Balance;
use super::profile::{Profile, ProfileId};
use super::query::{ContractQuery, JobQuery};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

/// Replace a profile's balance, provided it still holds `expected`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceChange {
    pub profile: ProfileId,
    pub expected: Balance,
    pub updated: Balance,
}

/// Mark a job paid, provided it is still unpaid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobPayment {
    pub job: JobId,
    pub paid_at: DateTime<Utc>,
}

/// Writes that a store applies all together or not at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSet {
    pub balances: Vec<BalanceChange>,
    pub payments: Vec<JobPayment>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn change_balance(mut self, profile: ProfileId, expected: Balance, updated: Balance) -> Self {
        self.balances.push(BalanceChange {
            profile,
            expected,
            updated,
        });
        self
    }

    pub fn pay_job(mut self, job: JobId, paid_at: DateTime<Utc>) -> Self {
        self.payments.push(JobPayment { job, paid_at });
        self
    }

    /// Each profile and job may appear at most once; every expectation is
    /// checked against stored state, not against earlier writes in the set.
    pub fn ensure_distinct(&self) -> Result<()> {
        let mut profiles = HashSet::new();
        if let Some(change) = self.balances.iter().find(|c| !profiles.insert(c.profile)) {
            return Err(LedgerError::Validation(format!(
                "write-set changes profile {} more than once",
                change.profile
            )));
        }
        let mut jobs = HashSet::new();
        if let Some(payment) = self.payments.iter().find(|p| !jobs.insert(p.job)) {
            return Err(LedgerError::Validation(format!(
                "write-set pays job {} more than once",
                payment.job
            )));
        }
        Ok(())
    }
}

/// Durable record of profiles, contracts and jobs.
///
/// `commit` is the only way balances and payment state change after
/// provisioning. Implementations must reject a write-set that fails
/// `WriteSet::ensure_distinct` with `LedgerError::Validation`, then validate
/// every expectation and apply it atomically, returning
/// `LedgerError::Conflict` with nothing applied when any expectation no
/// longer holds. `insert_contract` must reject contracts that fail
/// `Contract::validate`.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn profile(&self, id: ProfileId) -> Result<Option<Profile>>;
    async fn profiles(&self, ids: &[ProfileId]) -> Result<Vec<Profile>>;
    async fn contract(&self, id: ContractId) -> Result<Option<Contract>>;
    async fn contracts(&self, query: &ContractQuery) -> Result<Vec<Contract>>;
    async fn job(&self, id: JobId) -> Result<Option<Job>>;
    async fn jobs(&self, query: &JobQuery) -> Result<Vec<Job>>;

    async fn insert_profile(&self, profile: Profile) -> Result<()>;
    async fn insert_contract(&self, contract: Contract) -> Result<()>;
    async fn insert_job(&self, job: Job) -> Result<()>;

    async fn commit(&self, writes: WriteSet) -> Result<()>;
}

pub type LedgerStoreRef = Arc<dyn LedgerStore>;
