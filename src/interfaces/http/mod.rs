//! HTTP surface built on axum.

pub mod auth;
pub mod error;
pub mod handlers;

use crate::application::identity::IdentityResolver;
use crate::application::queries::QueryService;
use crate::application::reporting::ReportingEngine;
use crate::application::retry::RetryPolicy;
use crate::application::settlement::SettlementEngine;
use crate::domain::ports::LedgerStoreRef;
use axum::{Router, middleware, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Services shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub identity: IdentityResolver,
    pub queries: QueryService,
    pub settlement: SettlementEngine,
    pub reporting: ReportingEngine,
}

impl AppState {
    pub fn new(store: LedgerStoreRef, retry: RetryPolicy) -> Self {
        Self {
            identity: IdentityResolver::new(store.clone()),
            queries: QueryService::new(store.clone()),
            settlement: SettlementEngine::new(store.clone(), retry),
            reporting: ReportingEngine::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let authenticated = Router::new()
        .route("/contracts", get(handlers::list_contracts))
        .route("/contracts/:id", get(handlers::get_contract))
        .route("/jobs/unpaid", get(handlers::list_unpaid_jobs))
        .route("/jobs/:job_id/pay", get(handlers::pay_job))
        .route("/balances/deposit/:user_id", get(handlers::deposit))
        .route("/admin/best-profession", get(handlers::best_profession))
        .route("/admin/best-clients", get(handlers::best_clients))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::profile_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(authenticated)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
