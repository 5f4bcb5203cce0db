use crate::domain::contract::{Contract, ContractId};
use crate::domain::job::{Job, JobId};
use crate::domain::ports::{LedgerStore, WriteSet};
use crate::domain::profile::{Profile, ProfileId};
use crate::domain::query::{ContractQuery, JobQuery};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Ledger {
    profiles: BTreeMap<ProfileId, Profile>,
    contracts: BTreeMap<ContractId, Contract>,
    jobs: BTreeMap<JobId, Job>,
}

impl Ledger {
    /// Checks every expectation before anything is touched.
    fn validate(&self, writes: &WriteSet) -> Result<()> {
        writes.ensure_distinct()?;
        for change in &writes.balances {
            let profile = self.profiles.get(&change.profile).ok_or_else(|| {
                LedgerError::Conflict(format!("profile {} disappeared", change.profile))
            })?;
            if profile.balance != change.expected {
                return Err(LedgerError::Conflict(format!(
                    "balance of profile {} changed concurrently",
                    change.profile
                )));
            }
        }
        for payment in &writes.payments {
            let job = self
                .jobs
                .get(&payment.job)
                .ok_or_else(|| LedgerError::Conflict(format!("job {} disappeared", payment.job)))?;
            if job.is_paid() {
                return Err(LedgerError::Conflict(format!(
                    "job {} was paid concurrently",
                    payment.job
                )));
            }
        }
        Ok(())
    }

    fn apply(&mut self, writes: WriteSet) -> Result<()> {
        for change in writes.balances {
            if let Some(profile) = self.profiles.get_mut(&change.profile) {
                profile.balance = change.updated;
            }
        }
        for payment in writes.payments {
            if let Some(job) = self.jobs.get_mut(&payment.job) {
                job.mark_paid(payment.paid_at)?;
            }
        }
        Ok(())
    }
}

/// A thread-safe in-memory ledger.
///
/// All entities sit behind one `RwLock`, so a commit holding the write lock
/// is isolated from every other read and write. Used by default and in tests.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    ledger: Arc<RwLock<Ledger>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn profile(&self, id: ProfileId) -> Result<Option<Profile>> {
        let ledger = self.ledger.read().await;
        Ok(ledger.profiles.get(&id).cloned())
    }

    async fn profiles(&self, ids: &[ProfileId]) -> Result<Vec<Profile>> {
        let ledger = self.ledger.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| ledger.profiles.get(id).cloned())
            .collect())
    }

    async fn contract(&self, id: ContractId) -> Result<Option<Contract>> {
        let ledger = self.ledger.read().await;
        Ok(ledger.contracts.get(&id).cloned())
    }

    async fn contracts(&self, query: &ContractQuery) -> Result<Vec<Contract>> {
        let ledger = self.ledger.read().await;
        Ok(ledger
            .contracts
            .values()
            .filter(|c| query.matches(c))
            .cloned()
            .collect())
    }

    async fn job(&self, id: JobId) -> Result<Option<Job>> {
        let ledger = self.ledger.read().await;
        Ok(ledger.jobs.get(&id).cloned())
    }

    async fn jobs(&self, query: &JobQuery) -> Result<Vec<Job>> {
        let ledger = self.ledger.read().await;
        Ok(ledger
            .jobs
            .values()
            .filter(|j| query.matches(j))
            .cloned()
            .collect())
    }

    async fn insert_profile(&self, profile: Profile) -> Result<()> {
        let mut ledger = self.ledger.write().await;
        if ledger.profiles.contains_key(&profile.id) {
            return Err(LedgerError::Validation(format!(
                "profile {} already exists",
                profile.id
            )));
        }
        ledger.profiles.insert(profile.id, profile);
        Ok(())
    }

    async fn insert_contract(&self, contract: Contract) -> Result<()> {
        contract.validate()?;
        let mut ledger = self.ledger.write().await;
        if ledger.contracts.contains_key(&contract.id) {
            return Err(LedgerError::Validation(format!(
                "contract {} already exists",
                contract.id
            )));
        }
        ledger.contracts.insert(contract.id, contract);
        Ok(())
    }

    async fn insert_job(&self, job: Job) -> Result<()> {
        let mut ledger = self.ledger.write().await;
        if ledger.jobs.contains_key(&job.id) {
            return Err(LedgerError::Validation(format!("job {} already exists", job.id)));
        }
        ledger.jobs.insert(job.id, job);
        Ok(())
    }

    async fn commit(&self, writes: WriteSet) -> Result<()> {
        let mut ledger = self.ledger.write().await;
        ledger.validate(&writes)?;
        ledger.apply(writes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::ContractStatus;
    use crate::domain::money::{Amount, Balance};
    use crate::domain::profile::ProfileKind;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn profile(id: u32, balance: rust_decimal::Decimal) -> Profile {
        Profile {
            id: ProfileId(id),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            profession: "Tester".to_string(),
            balance: Balance::new(balance).unwrap(),
            kind: ProfileKind::Client,
        }
    }

    fn job(id: u32) -> Job {
        Job::unpaid(
            JobId(id),
            ContractId(1),
            "work".to_string(),
            Amount::new(dec!(10)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_in_memory_profile_store() {
        let store = InMemoryLedgerStore::new();
        let p = profile(1, dec!(100));
        store.insert_profile(p.clone()).await.unwrap();

        assert_eq!(store.profile(ProfileId(1)).await.unwrap(), Some(p));
        assert!(store.profile(ProfileId(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = InMemoryLedgerStore::new();
        store.insert_profile(profile(1, dec!(1))).await.unwrap();
        let again = store.insert_profile(profile(1, dec!(2))).await;
        assert!(matches!(again, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_contract_query_filtering() {
        let store = InMemoryLedgerStore::new();
        for (id, status) in [
            (1, ContractStatus::New),
            (2, ContractStatus::InProgress),
            (3, ContractStatus::Terminated),
        ] {
            store
                .insert_contract(Contract {
                    id: ContractId(id),
                    terms: String::new(),
                    status,
                    client_id: ProfileId(1),
                    contractor_id: ProfileId(5),
                })
                .await
                .unwrap();
        }

        let active = store
            .contracts(&ContractQuery::for_client(ProfileId(1)).excluding(ContractStatus::Terminated))
            .await
            .unwrap();
        let ids: Vec<_> = active.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ContractId(1), ContractId(2)]);
    }

    #[tokio::test]
    async fn test_commit_applies_all_writes() {
        let store = InMemoryLedgerStore::new();
        store.insert_profile(profile(1, dec!(100))).await.unwrap();
        store.insert_profile(profile(2, dec!(0))).await.unwrap();
        store.insert_job(job(1)).await.unwrap();

        let writes = WriteSet::new()
            .change_balance(ProfileId(1), Balance::new(dec!(100)).unwrap(), Balance::new(dec!(90)).unwrap())
            .change_balance(ProfileId(2), Balance::ZERO, Balance::new(dec!(10)).unwrap())
            .pay_job(JobId(1), Utc::now());
        store.commit(writes).await.unwrap();

        assert_eq!(store.profile(ProfileId(1)).await.unwrap().unwrap().balance.value(), dec!(90));
        assert_eq!(store.profile(ProfileId(2)).await.unwrap().unwrap().balance.value(), dec!(10));
        assert!(store.job(JobId(1)).await.unwrap().unwrap().is_paid());
    }

    #[tokio::test]
    async fn test_commit_is_all_or_nothing() {
        let store = InMemoryLedgerStore::new();
        store.insert_profile(profile(1, dec!(100))).await.unwrap();
        store.insert_profile(profile(2, dec!(0))).await.unwrap();
        store.insert_job(job(1)).await.unwrap();

        // second change carries a stale expectation
        let writes = WriteSet::new()
            .change_balance(ProfileId(1), Balance::new(dec!(100)).unwrap(), Balance::new(dec!(90)).unwrap())
            .change_balance(ProfileId(2), Balance::new(dec!(5)).unwrap(), Balance::new(dec!(15)).unwrap())
            .pay_job(JobId(1), Utc::now());
        let result = store.commit(writes).await;

        assert!(matches!(result, Err(LedgerError::Conflict(_))));
        assert_eq!(store.profile(ProfileId(1)).await.unwrap().unwrap().balance.value(), dec!(100));
        assert!(!store.job(JobId(1)).await.unwrap().unwrap().is_paid());
    }

    #[tokio::test]
    async fn test_commit_rejects_same_profile_twice() {
        let store = InMemoryLedgerStore::new();
        store.insert_profile(profile(1, dec!(1000))).await.unwrap();
        store.insert_job(job(1)).await.unwrap();

        // both changes expect 1000, so applying them in turn would leave 1200
        let start = Balance::new(dec!(1000)).unwrap();
        let writes = WriteSet::new()
            .change_balance(ProfileId(1), start, Balance::new(dec!(800)).unwrap())
            .change_balance(ProfileId(1), start, Balance::new(dec!(1200)).unwrap())
            .pay_job(JobId(1), Utc::now());
        let result = store.commit(writes).await;

        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert_eq!(store.profile(ProfileId(1)).await.unwrap().unwrap().balance.value(), dec!(1000));
        assert!(!store.job(JobId(1)).await.unwrap().unwrap().is_paid());
    }

    #[tokio::test]
    async fn test_contract_with_itself_rejected() {
        let store = InMemoryLedgerStore::new();
        let result = store
            .insert_contract(Contract {
                id: ContractId(1),
                terms: String::new(),
                status: ContractStatus::InProgress,
                client_id: ProfileId(1),
                contractor_id: ProfileId(1),
            })
            .await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert!(store.contract(ContractId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_commit_rejects_paying_twice() {
        let store = InMemoryLedgerStore::new();
        store.insert_job(job(1)).await.unwrap();

        store.commit(WriteSet::new().pay_job(JobId(1), Utc::now())).await.unwrap();
        let again = store.commit(WriteSet::new().pay_job(JobId(1), Utc::now())).await;
        assert!(matches!(again, Err(LedgerError::Conflict(_))));
    }
}
