//! Typed filters understood by every `LedgerStore` backend.

use super::contract::{Contract, ContractId, ContractStatus};
use super::job::Job;
use super::profile::ProfileId;
use crate::error::LedgerError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractQuery {
    pub client: Option<ProfileId>,
    pub contractor: Option<ProfileId>,
    pub status: Option<ContractStatus>,
    pub exclude_status: Option<ContractStatus>,
}

impl ContractQuery {
    pub fn for_client(client: ProfileId) -> Self {
        Self {
            client: Some(client),
            ..Self::default()
        }
    }

    pub fn for_contractor(contractor: ProfileId) -> Self {
        Self {
            contractor: Some(contractor),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: ContractStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn excluding(mut self, status: ContractStatus) -> Self {
        self.exclude_status = Some(status);
        self
    }

    pub fn matches(&self, contract: &Contract) -> bool {
        self.client.is_none_or(|id| contract.client_id == id)
            && self.contractor.is_none_or(|id| contract.contractor_id == id)
            && self.status.is_none_or(|s| contract.status == s)
            && self.exclude_status.is_none_or(|s| contract.status != s)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobQuery {
    pub contracts: Option<HashSet<ContractId>>,
    pub paid: Option<bool>,
    pub paid_within: Option<ReportWindow>,
}

impl JobQuery {
    pub fn on_contracts(ids: impl IntoIterator<Item = ContractId>) -> Self {
        Self {
            contracts: Some(ids.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn paid_within(window: ReportWindow) -> Self {
        Self {
            paid_within: Some(window),
            ..Self::default()
        }
    }

    pub fn unpaid(mut self) -> Self {
        self.paid = Some(false);
        self
    }

    pub fn within(mut self, window: ReportWindow) -> Self {
        self.paid_within = Some(window);
        self
    }

    pub fn matches(&self, job: &Job) -> bool {
        self.contracts
            .as_ref()
            .is_none_or(|ids| ids.contains(&job.contract_id))
            && self.paid.is_none_or(|paid| job.is_paid() == paid)
            && self.paid_within.as_ref().is_none_or(|window| {
                job.is_paid() && job.payment_date().is_some_and(|at| window.contains(at))
            })
    }
}

/// An inclusive `[start, end]` range over payment dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ReportWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, LedgerError> {
        if start > end {
            return Err(LedgerError::Validation(format!(
                "window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
    ///
    /// A date-only end covers the whole of that day.
    pub fn parse(start: &str, end: &str) -> Result<Self, LedgerError> {
        let start = parse_bound(start, NaiveTime::MIN)?;
        let end_of_day = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| LedgerError::Validation("invalid end of day".to_string()))?;
        let end = parse_bound(end, end_of_day)?;
        Self::new(start, end)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

fn parse_bound(raw: &str, time_of_day: NaiveTime) -> Result<DateTime<Utc>, LedgerError> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(time_of_day).and_utc())
        .map_err(|_| LedgerError::Validation(format!("invalid date: {raw:?}")))
}
