//! Route handlers
//!
//! Each handler receives the `AuthContext` placed by the profile middleware
//! and delegates straight to an application service.

use super::AppState;
use crate::application::reporting::{DEFAULT_CLIENT_LIMIT, RankedClient};
use crate::domain::auth::AuthContext;
use crate::domain::contract::{Contract, ContractId};
use crate::domain::job::{Job, JobId};
use crate::domain::profile::ProfileId;
use crate::domain::query::ReportWindow;
use crate::error::LedgerError;
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};

const OK: &str = "ok";

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<usize>,
}

impl WindowQuery {
    fn window(&self) -> Result<ReportWindow, LedgerError> {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => ReportWindow::parse(start, end),
            _ => Err(LedgerError::Validation(
                "both start and end are required".to_string(),
            )),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: OK,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /contracts/:id
pub async fn get_contract(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<u32>, PathRejection>,
) -> Result<Json<Contract>, LedgerError> {
    let Path(id) = path?;
    let contract = state.queries.contract(&auth, ContractId(id)).await?;
    Ok(Json(contract))
}

/// GET /contracts
pub async fn list_contracts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Contract>>, LedgerError> {
    Ok(Json(state.queries.active_contracts(&auth).await?))
}

/// GET /jobs/unpaid
pub async fn list_unpaid_jobs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Job>>, LedgerError> {
    Ok(Json(state.queries.unpaid_jobs(&auth).await?))
}

/// GET /jobs/:job_id/pay
pub async fn pay_job(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<u32>, PathRejection>,
) -> Result<Json<&'static str>, LedgerError> {
    let Path(job_id) = path?;
    state.settlement.settle(&auth, JobId(job_id)).await?;
    Ok(Json(OK))
}

/// GET /balances/deposit/:user_id
pub async fn deposit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<u32>, PathRejection>,
) -> Result<Json<&'static str>, LedgerError> {
    let Path(user_id) = path?;
    state.settlement.deposit(&auth, ProfileId(user_id)).await?;
    Ok(Json(OK))
}

/// GET /admin/best-profession?start&end
pub async fn best_profession(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<String>, LedgerError> {
    let Query(query) = query?;
    let best = state
        .reporting
        .best_profession(&auth, query.window()?)
        .await?;
    Ok(Json(best.profession))
}

/// GET /admin/best-clients?start&end&limit
pub async fn best_clients(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<Vec<RankedClient>>, LedgerError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_CLIENT_LIMIT);
    let clients = state.reporting.best_clients(query.window()?, limit).await?;
    Ok(Json(clients))
}
