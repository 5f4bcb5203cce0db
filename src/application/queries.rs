use crate::domain::auth::AuthContext;
use crate::domain::contract::{Contract, ContractId, ContractStatus};
use crate::domain::job::Job;
use crate::domain::ports::LedgerStoreRef;
use crate::domain::profile::ProfileKind;
use crate::domain::query::{ContractQuery, JobQuery};
use crate::error::{LedgerError, Result};

/// Listings scoped to the caller's side of their contracts.
#[derive(Clone)]
pub struct QueryService {
    store: LedgerStoreRef,
}

impl QueryService {
    pub fn new(store: LedgerStoreRef) -> Self {
        Self { store }
    }

    pub async fn contract(&self, auth: &AuthContext, id: ContractId) -> Result<Contract> {
        let contract = self
            .store
            .contract(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("contract {id}")))?;
        if !contract.is_party(auth.profile()) {
            return Err(LedgerError::Unauthorized(format!(
                "profile {} is not a party to contract {id}",
                auth.id()
            )));
        }
        Ok(contract)
    }

    /// Contracts the caller is on that have not been terminated.
    pub async fn active_contracts(&self, auth: &AuthContext) -> Result<Vec<Contract>> {
        self.store
            .contracts(&side_of(auth).excluding(ContractStatus::Terminated))
            .await
    }

    /// Unpaid jobs on the caller's in-progress contracts.
    pub async fn unpaid_jobs(&self, auth: &AuthContext) -> Result<Vec<Job>> {
        let contracts = self
            .store
            .contracts(&side_of(auth).with_status(ContractStatus::InProgress))
            .await?;
        self.store
            .jobs(&JobQuery::on_contracts(contracts.iter().map(|c| c.id)).unpaid())
            .await
    }
}

fn side_of(auth: &AuthContext) -> ContractQuery {
    match auth.kind() {
        ProfileKind::Client => ContractQuery::for_client(auth.id()),
        ProfileKind::Contractor => ContractQuery::for_contractor(auth.id()),
    }
}
