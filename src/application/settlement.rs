use super::retry::RetryPolicy;
use crate::domain::auth::AuthContext;
use crate::domain::contract::ContractStatus;
use crate::domain::job::JobId;
use crate::domain::money::{Amount, Balance};
use crate::domain::ports::{LedgerStoreRef, WriteSet};
use crate::domain::profile::ProfileId;
use crate::domain::query::{ContractQuery, JobQuery};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Receipt for a completed job payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub job: JobId,
    pub client: ProfileId,
    pub contractor: ProfileId,
    pub amount: Amount,
    pub paid_at: DateTime<Utc>,
    pub client_balance: Balance,
    pub contractor_balance: Balance,
}

/// Deposit rule carried over as-is: a client may top up by `share` of their
/// balance unless that exceeds `outstanding_multiplier` times what they still
/// owe on unpaid jobs of live contracts.
// TODO: confirm the deposit formula with the finance team; the amount source is not defined upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositPolicy {
    pub share: Decimal,
    pub outstanding_multiplier: Decimal,
}

impl Default for DepositPolicy {
    fn default() -> Self {
        Self {
            share: dec!(0.20),
            outstanding_multiplier: dec!(1.25),
        }
    }
}

/// Moves money between profile balances.
///
/// Every mutation goes through a single `LedgerStore::commit`, so a payment
/// either debits the client, credits the contractor and marks the job paid,
/// or leaves all three untouched. Store conflicts re-run the whole check
/// sequence against fresh reads under the configured `RetryPolicy`.
#[derive(Clone)]
pub struct SettlementEngine {
    store: LedgerStoreRef,
    retry: RetryPolicy,
    deposit_policy: DepositPolicy,
}

impl SettlementEngine {
    pub fn new(store: LedgerStoreRef, retry: RetryPolicy) -> Self {
        Self {
            store,
            retry,
            deposit_policy: DepositPolicy::default(),
        }
    }

    /// Pays `job_id` from the caller's balance to the contract's contractor.
    pub async fn settle(&self, auth: &AuthContext, job_id: JobId) -> Result<Settlement> {
        if !auth.is_client() {
            return Err(LedgerError::Unauthorized(format!(
                "profile {} is not a client",
                auth.id()
            )));
        }

        let settlement = self
            .retry
            .run("settle", move || self.try_settle(auth.id(), job_id))
            .await?;

        tracing::info!(
            job = %settlement.job,
            client = %settlement.client,
            contractor = %settlement.contractor,
            amount = %settlement.amount,
            "job settled"
        );
        Ok(settlement)
    }

    async fn try_settle(&self, caller: ProfileId, job_id: JobId) -> Result<Settlement> {
        let job = self
            .store
            .job(job_id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("job {job_id}")))?;

        let client = self
            .store
            .profile(caller)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("profile {caller}")))?;
        let client_balance = client.balance.debit(job.price)?;

        let contract = self
            .store
            .contract(job.contract_id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("contract {}", job.contract_id)))?;
        if contract.client_id != client.id {
            return Err(LedgerError::Unauthorized(format!(
                "profile {} is not the client of contract {}",
                client.id, contract.id
            )));
        }

        let contractor = self
            .store
            .profile(contract.contractor_id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("profile {}", contract.contractor_id)))?;

        if job.is_paid() {
            return Err(LedgerError::AlreadyPaid(job.id.0));
        }

        let paid_at = Utc::now();
        let contractor_balance = contractor.balance.credit(job.price)?;
        let writes = WriteSet::new()
            .change_balance(client.id, client.balance, client_balance)
            .change_balance(contractor.id, contractor.balance, contractor_balance)
            .pay_job(job.id, paid_at);

        self.commit(writes).await?;

        Ok(Settlement {
            job: job.id,
            client: client.id,
            contractor: contractor.id,
            amount: job.price,
            paid_at,
            client_balance,
            contractor_balance,
        })
    }

    /// Tops up the caller's own balance according to the `DepositPolicy`.
    ///
    /// Returns the new balance.
    pub async fn deposit(&self, auth: &AuthContext, user_id: ProfileId) -> Result<Balance> {
        if !auth.is_client() || user_id != auth.id() {
            return Err(LedgerError::Unauthorized(format!(
                "profile {} cannot deposit to {user_id}",
                auth.id()
            )));
        }

        let balance = self
            .retry
            .run("deposit", move || self.try_deposit(user_id))
            .await?;

        tracing::info!(profile = %user_id, %balance, "deposit applied");
        Ok(balance)
    }

    async fn try_deposit(&self, id: ProfileId) -> Result<Balance> {
        let profile = self
            .store
            .profile(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("profile {id}")))?;

        let contracts = self
            .store
            .contracts(&ContractQuery::for_client(id).excluding(ContractStatus::Terminated))
            .await?;
        let outstanding = self
            .store
            .jobs(&JobQuery::on_contracts(contracts.iter().map(|c| c.id)).unpaid())
            .await?
            .into_iter()
            .try_fold(Balance::ZERO, |total, job| total.credit(job.price))?;

        let overflow = || LedgerError::Validation(format!("deposit for profile {id} overflows"));
        let amount = profile
            .balance
            .value()
            .checked_mul(self.deposit_policy.share)
            .ok_or_else(overflow)?;
        let limit = outstanding
            .value()
            .checked_mul(self.deposit_policy.outstanding_multiplier)
            .ok_or_else(overflow)?;
        if amount > limit {
            return Err(LedgerError::DepositLimitExceeded { amount, limit });
        }

        let updated = profile
            .balance
            .value()
            .checked_add(amount)
            .ok_or_else(overflow)
            .and_then(Balance::new)?;
        self.commit(WriteSet::new().change_balance(id, profile.balance, updated))
            .await?;
        Ok(updated)
    }

    async fn commit(&self, writes: WriteSet) -> Result<()> {
        match self.store.commit(writes).await {
            Err(e) if !e.is_retryable() => {
                tracing::error!(error = %e, "ledger commit failed");
                Err(LedgerError::TransactionFailed(e.to_string()))
            }
            other => other,
        }
    }
}
