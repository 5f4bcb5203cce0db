use super::profile::{Profile, ProfileId, ProfileKind};

/// The caller identity resolved once per request.
///
/// The wrapped profile is a snapshot taken at resolution time; anything that
/// moves money re-reads the balance from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    profile: Profile,
}

impl AuthContext {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn id(&self) -> ProfileId {
        self.profile.id
    }

    pub fn kind(&self) -> ProfileKind {
        self.profile.kind
    }

    pub fn is_client(&self) -> bool {
        self.profile.is_client()
    }
}
