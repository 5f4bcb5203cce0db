use super::profile::{Profile, ProfileId, ProfileKind};
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(pub u32);

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    New,
    InProgress,
    Terminated,
}

/// An agreement between one client and one contractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub terms: String,
    pub status: ContractStatus,
    #[serde(rename = "ClientId")]
    pub client_id: ProfileId,
    #[serde(rename = "ContractorId")]
    pub contractor_id: ProfileId,
}

impl Contract {
    /// Rejects contracts whose client and contractor are the same profile.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.client_id == self.contractor_id {
            return Err(LedgerError::Validation(format!(
                "contract {}: client and contractor are the same profile",
                self.id
            )));
        }
        Ok(())
    }

    /// Whether `profile` sits on the side of the contract its kind implies.
    pub fn is_party(&self, profile: &Profile) -> bool {
        match profile.kind {
            ProfileKind::Client => self.client_id == profile.id,
            ProfileKind::Contractor => self.contractor_id == profile.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Balance;

    fn contract() -> Contract {
        Contract {
            id: ContractId(1),
            terms: "bla bla bla".to_string(),
            status: ContractStatus::InProgress,
            client_id: ProfileId(1),
            contractor_id: ProfileId(5),
        }
    }

    #[test]
    fn test_party_depends_on_profile_kind() {
        let c = contract();
        let profile = |id, kind| Profile {
            id: ProfileId(id),
            first_name: String::new(),
            last_name: String::new(),
            profession: String::new(),
            balance: Balance::ZERO,
            kind,
        };
        assert!(c.is_party(&profile(1, ProfileKind::Client)));
        assert!(c.is_party(&profile(5, ProfileKind::Contractor)));
        // right id, wrong side
        assert!(!c.is_party(&profile(1, ProfileKind::Contractor)));
        assert!(!c.is_party(&profile(2, ProfileKind::Client)));
    }

    #[test]
    fn test_same_party_contract_is_invalid() {
        assert!(contract().validate().is_ok());
        let own = Contract {
            contractor_id: ProfileId(1),
            ..contract()
        };
        assert!(matches!(own.validate(), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_value(contract()).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["ClientId"], 1);
        assert_eq!(json["ContractorId"], 5);
    }
}
