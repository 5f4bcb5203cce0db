//! Profile resolution middleware

use super::AppState;
use crate::application::identity::PROFILE_HEADER;
use crate::error::LedgerError;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

/// Resolves the `profile_id` header and injects the `AuthContext` into request
/// extensions. Unknown or missing profiles stop the request with 401.
pub async fn profile_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, LedgerError> {
    let header = request
        .headers()
        .get(PROFILE_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let auth = state.identity.resolve(header.as_deref()).await?;
    tracing::debug!(profile = %auth.id(), "profile resolved");

    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}
