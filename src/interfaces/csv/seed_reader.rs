use crate::domain::contract::{Contract, ContractId, ContractStatus};
use crate::domain::job::{Job, JobId};
use crate::domain::money::{Amount, Balance};
use crate::domain::ports::LedgerStore;
use crate::domain::profile::{Profile, ProfileId, ProfileKind};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const PROFILES_FILE: &str = "profiles.csv";
pub const CONTRACTS_FILE: &str = "contracts.csv";
pub const JOBS_FILE: &str = "jobs.csv";

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    id: u32,
    first_name: String,
    last_name: String,
    profession: String,
    balance: Decimal,
    #[serde(rename = "type")]
    kind: ProfileKind,
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = LedgerError;

    fn try_from(r: ProfileRecord) -> Result<Self> {
        Ok(Profile {
            id: ProfileId(r.id),
            first_name: r.first_name,
            last_name: r.last_name,
            profession: r.profession,
            balance: Balance::new(r.balance)?,
            kind: r.kind,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ContractRecord {
    id: u32,
    terms: String,
    status: ContractStatus,
    client_id: u32,
    contractor_id: u32,
}

impl TryFrom<ContractRecord> for Contract {
    type Error = LedgerError;

    fn try_from(r: ContractRecord) -> Result<Self> {
        let contract = Contract {
            id: ContractId(r.id),
            terms: r.terms,
            status: r.status,
            client_id: ProfileId(r.client_id),
            contractor_id: ProfileId(r.contractor_id),
        };
        contract.validate()?;
        Ok(contract)
    }
}

#[derive(Debug, Deserialize)]
struct JobRecord {
    id: u32,
    description: String,
    price: Decimal,
    #[serde(default)]
    paid: bool,
    payment_date: Option<DateTime<Utc>>,
    contract_id: u32,
}

impl TryFrom<JobRecord> for Job {
    type Error = LedgerError;

    fn try_from(r: JobRecord) -> Result<Self> {
        Job::restore(
            JobId(r.id),
            ContractId(r.contract_id),
            r.description,
            Amount::new(r.price)?,
            r.paid,
            r.payment_date,
        )
    }
}

/// Reads seed rows of one entity kind from a CSV source.
///
/// Rows are deserialized lazily; each row is validated while converting to
/// the domain type, so the first bad row stops the load with its error.
pub struct SeedReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SeedReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    fn records<Rec, T>(self) -> impl Iterator<Item = Result<T>>
    where
        Rec: DeserializeOwned,
        T: TryFrom<Rec, Error = LedgerError>,
    {
        self.reader
            .into_deserialize::<Rec>()
            .map(|row| row.map_err(LedgerError::from).and_then(T::try_from))
    }

    pub fn profiles(self) -> impl Iterator<Item = Result<Profile>> {
        self.records::<ProfileRecord, Profile>()
    }

    pub fn contracts(self) -> impl Iterator<Item = Result<Contract>> {
        self.records::<ContractRecord, Contract>()
    }

    pub fn jobs(self) -> impl Iterator<Item = Result<Job>> {
        self.records::<JobRecord, Job>()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub profiles: usize,
    pub contracts: usize,
    pub jobs: usize,
}

/// Loads `profiles.csv`, `contracts.csv` and `jobs.csv` from `dir` into `store`.
pub async fn load_seed_dir(store: &dyn LedgerStore, dir: &Path) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for profile in SeedReader::new(File::open(dir.join(PROFILES_FILE))?).profiles() {
        store.insert_profile(profile?).await?;
        summary.profiles += 1;
    }
    for contract in SeedReader::new(File::open(dir.join(CONTRACTS_FILE))?).contracts() {
        store.insert_contract(contract?).await?;
        summary.contracts += 1;
    }
    for job in SeedReader::new(File::open(dir.join(JOBS_FILE))?).jobs() {
        store.insert_job(job?).await?;
        summary.jobs += 1;
    }

    tracing::info!(
        profiles = summary.profiles,
        contracts = summary.contracts,
        jobs = summary.jobs,
        dir = %dir.display(),
        "seed loaded"
    );
    Ok(summary)
}
