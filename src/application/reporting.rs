use crate::domain::auth::AuthContext;
use crate::domain::contract::{Contract, ContractId};
use crate::domain::money::Balance;
use crate::domain::ports::LedgerStoreRef;
use crate::domain::profile::{Profile, ProfileId};
use crate::domain::query::{ContractQuery, JobQuery, ReportWindow};
use crate::error::{LedgerError, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_CLIENT_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessionEarnings {
    pub profession: String,
    pub total: Balance,
}

/// A client profile together with what it paid inside the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedClient {
    #[serde(flatten)]
    pub profile: Profile,
    pub paid: Balance,
}

/// Read-only aggregations over jobs paid inside a `ReportWindow`.
#[derive(Clone)]
pub struct ReportingEngine {
    store: LedgerStoreRef,
}

impl ReportingEngine {
    pub fn new(store: LedgerStoreRef) -> Self {
        Self { store }
    }

    /// The contractor profession that earned the most from the caller's contracts.
    ///
    /// Equal totals go to the profession whose name sorts first.
    pub async fn best_profession(
        &self,
        auth: &AuthContext,
        window: ReportWindow,
    ) -> Result<ProfessionEarnings> {
        let contracts = self
            .store
            .contracts(&ContractQuery::for_client(auth.id()))
            .await?;
        let jobs = self
            .store
            .jobs(&JobQuery::on_contracts(contracts.iter().map(|c| c.id)).within(window))
            .await?;
        if jobs.is_empty() {
            return Err(LedgerError::NoData);
        }

        let contracts = index_contracts(contracts);
        let contractors = self
            .load_profiles(contracts.values().map(|c| c.contractor_id))
            .await?;

        let mut earnings: BTreeMap<&str, Balance> = BTreeMap::new();
        for job in &jobs {
            let Some(contractor) = contracts
                .get(&job.contract_id)
                .and_then(|c| contractors.get(&c.contractor_id))
            else {
                tracing::warn!(job = %job.id, "skipping job without a resolvable contractor");
                continue;
            };
            let total = earnings.entry(contractor.profession.as_str()).or_default();
            *total = total.credit(job.price)?;
        }

        // strict comparison keeps the alphabetically first of equal totals
        let mut best: Option<(&str, Balance)> = None;
        for (profession, total) in earnings {
            if best.is_none_or(|(_, top)| total > top) {
                best = Some((profession, total));
            }
        }

        best.map(|(profession, total)| ProfessionEarnings {
            profession: profession.to_string(),
            total,
        })
        .ok_or(LedgerError::NoData)
    }

    /// The clients who paid the most across all contracts, highest first.
    ///
    /// Equal totals are ordered by ascending client id.
    pub async fn best_clients(&self, window: ReportWindow, limit: usize) -> Result<Vec<RankedClient>> {
        let jobs = self.store.jobs(&JobQuery::paid_within(window)).await?;

        let mut contracts = HashMap::new();
        for contract_id in jobs.iter().map(|j| j.contract_id) {
            if contracts.contains_key(&contract_id) {
                continue;
            }
            if let Some(contract) = self.store.contract(contract_id).await? {
                contracts.insert(contract_id, contract);
            }
        }

        let mut totals: HashMap<ProfileId, Balance> = HashMap::new();
        for job in &jobs {
            let Some(contract) = contracts.get(&job.contract_id) else {
                tracing::warn!(job = %job.id, "skipping job without a contract");
                continue;
            };
            let total = totals.entry(contract.client_id).or_default();
            *total = total.credit(job.price)?;
        }

        let mut ranked: Vec<(ProfileId, Balance)> = totals.into_iter().collect();
        ranked.sort_by(|(a_id, a_total), (b_id, b_total)| {
            b_total.cmp(a_total).then_with(|| a_id.cmp(b_id))
        });

        let mut clients = self.load_profiles(ranked.iter().map(|(id, _)| *id)).await?;
        let top = ranked
            .into_iter()
            .filter_map(|(id, paid)| match clients.remove(&id) {
                Some(profile) => Some(RankedClient { profile, paid }),
                None => {
                    tracing::warn!(client = %id, "skipping client without a profile");
                    None
                }
            })
            .take(limit)
            .collect();
        Ok(top)
    }

    async fn load_profiles(
        &self,
        ids: impl Iterator<Item = ProfileId>,
    ) -> Result<HashMap<ProfileId, Profile>> {
        let mut ids: Vec<ProfileId> = ids.collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(self
            .store
            .profiles(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect())
    }
}

fn index_contracts(contracts: Vec<Contract>) -> HashMap<ContractId, Contract> {
    contracts.into_iter().map(|c| (c.id, c)).collect()
}
