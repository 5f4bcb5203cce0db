use crate::domain::auth::AuthContext;
use crate::domain::ports::LedgerStoreRef;
use crate::domain::profile::ProfileId;
use crate::error::{LedgerError, Result};

/// Request header carrying the caller's profile id.
pub const PROFILE_HEADER: &str = "profile_id";

/// Turns a raw `profile_id` header value into an `AuthContext`.
#[derive(Clone)]
pub struct IdentityResolver {
    store: LedgerStoreRef,
}

impl IdentityResolver {
    pub fn new(store: LedgerStoreRef) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, header: Option<&str>) -> Result<AuthContext> {
        let raw = header.ok_or_else(|| LedgerError::Unauthorized("missing profile_id".to_string()))?;
        let id: ProfileId = raw
            .parse()
            .map_err(|_| LedgerError::Unauthorized(format!("malformed profile_id {raw:?}")))?;
        let profile = self
            .store
            .profile(id)
            .await?
            .ok_or_else(|| LedgerError::Unauthorized(format!("unknown profile {id}")))?;
        Ok(AuthContext::new(profile))
    }
}
