use backoffice::domain::contract::{ContractId, ContractStatus};
use backoffice::domain::job::JobId;
use backoffice::domain::ports::LedgerStore;
use backoffice::domain::profile::ProfileId;
use backoffice::error::LedgerError;
use backoffice::infrastructure::in_memory::InMemoryLedgerStore;
use backoffice::interfaces::csv::seed_reader::{SeedSummary, load_seed_dir};
use rust_decimal_macros::dec;
use std::fs;
use std::path::Path;

mod common;
use common::DEMO_SEED;

const PROFILES: &str = "id,first_name,last_name,profession,balance,type\n\
                        1,Harry,Potter,Wizard,1150,client\n\
                        2,Linus,Torvalds,Programmer,10,contractor\n";
const CONTRACTS: &str = "id,terms,status,client_id,contractor_id\n\
                         1,bla,in_progress,1,2\n";
const JOBS: &str = "id,description,price,paid,payment_date,contract_id\n\
                    1,work,200,false,,1\n";

fn write_seed(dir: &Path, profiles: &str, contracts: &str, jobs: &str) {
    fs::write(dir.join("profiles.csv"), profiles).unwrap();
    fs::write(dir.join("contracts.csv"), contracts).unwrap();
    fs::write(dir.join("jobs.csv"), jobs).unwrap();
}

#[tokio::test]
async fn test_demo_seed_loads_everything() {
    let store = InMemoryLedgerStore::new();
    let summary = load_seed_dir(&store, Path::new(DEMO_SEED)).await.unwrap();

    assert_eq!(
        summary,
        SeedSummary {
            profiles: 8,
            contracts: 9,
            jobs: 14,
        }
    );

    let harry = store.profile(ProfileId(1)).await.unwrap().unwrap();
    assert_eq!(harry.balance.value(), dec!(1150));
    assert!(harry.is_client());

    let contract = store.contract(ContractId(1)).await.unwrap().unwrap();
    assert_eq!(contract.status, ContractStatus::Terminated);

    assert!(store.job(JobId(14)).await.unwrap().unwrap().is_paid());
    assert!(!store.job(JobId(1)).await.unwrap().unwrap().is_paid());
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("profiles.csv"), PROFILES).unwrap();

    let store = InMemoryLedgerStore::new();
    let result = load_seed_dir(&store, dir.path()).await;
    assert!(matches!(result, Err(LedgerError::Io(_))));
}

#[tokio::test]
async fn test_duplicate_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let profiles = format!("{PROFILES}1,Ron,Weasley,Wizard,5,client\n");
    write_seed(dir.path(), &profiles, CONTRACTS, JOBS);

    let store = InMemoryLedgerStore::new();
    let result = load_seed_dir(&store, dir.path()).await;
    assert!(matches!(result, Err(LedgerError::Validation(_))));
}

#[tokio::test]
async fn test_negative_balance_row_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let profiles = format!("{PROFILES}3,Ron,Weasley,Wizard,-5,client\n");
    write_seed(dir.path(), &profiles, CONTRACTS, JOBS);

    let store = InMemoryLedgerStore::new();
    let result = load_seed_dir(&store, dir.path()).await;
    assert!(result.is_err());
    // rows before the bad one are already in
    assert!(store.profile(ProfileId(2)).await.unwrap().is_some());
    assert!(store.profile(ProfileId(3)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_contract_with_same_parties_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let contracts = "id,terms,status,client_id,contractor_id\n1,bla,new,1,1\n";
    write_seed(dir.path(), PROFILES, contracts, JOBS);

    let store = InMemoryLedgerStore::new();
    let result = load_seed_dir(&store, dir.path()).await;
    assert!(matches!(result, Err(LedgerError::Validation(_))));
}
