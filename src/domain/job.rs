use super::contract::ContractId;
use super::money::Amount;
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u32);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A billable unit of work under a contract.
///
/// `paid` and `payment_date` move together: a job is paid exactly when it
/// carries a payment date, and it never goes back to unpaid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub description: String,
    pub price: Amount,
    paid: bool,
    payment_date: Option<DateTime<Utc>>,
    #[serde(rename = "ContractId")]
    pub contract_id: ContractId,
}

impl Job {
    pub fn unpaid(id: JobId, contract_id: ContractId, description: String, price: Amount) -> Self {
        Self {
            id,
            description,
            price,
            paid: false,
            payment_date: None,
            contract_id,
        }
    }

    /// Rebuilds a job from stored fields, rejecting a paid flag without a date or vice versa.
    pub fn restore(
        id: JobId,
        contract_id: ContractId,
        description: String,
        price: Amount,
        paid: bool,
        payment_date: Option<DateTime<Utc>>,
    ) -> Result<Self, LedgerError> {
        if paid != payment_date.is_some() {
            return Err(LedgerError::Validation(format!(
                "job {id}: paid flag and payment date disagree"
            )));
        }
        Ok(Self {
            id,
            description,
            price,
            paid,
            payment_date,
            contract_id,
        })
    }

    pub fn is_paid(&self) -> bool {
        self.paid
    }

    pub fn payment_date(&self) -> Option<DateTime<Utc>> {
        self.payment_date
    }

    pub fn mark_paid(&mut self, at: DateTime<Utc>) -> Result<(), LedgerError> {
        if self.paid {
            return Err(LedgerError::AlreadyPaid(self.id.0));
        }
        self.paid = true;
        self.payment_date = Some(at);
        Ok(())
    }
}
