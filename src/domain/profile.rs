use super::money::Balance;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub u32);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProfileId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Client,
    Contractor,
}

/// An account on the marketplace: a client pays, a contractor earns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub balance: Balance,
    #[serde(rename = "type")]
    pub kind: ProfileKind,
}

impl Profile {
    pub fn is_client(&self) -> bool {
        self.kind == ProfileKind::Client
    }

    pub fn is_contractor(&self) -> bool {
        self.kind == ProfileKind::Contractor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_profile_json_shape() {
        let profile = Profile {
            id: ProfileId(1),
            first_name: "Harry".to_string(),
            last_name: "Potter".to_string(),
            profession: "Wizard".to_string(),
            balance: Balance::new(dec!(1150)).unwrap(),
            kind: ProfileKind::Client,
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["firstName"], "Harry");
        assert_eq!(json["type"], "client");
    }

    #[test]
    fn test_profile_id_from_header_value() {
        assert_eq!(" 7 ".parse::<ProfileId>().unwrap(), ProfileId(7));
        assert!("seven".parse::<ProfileId>().is_err());
    }
}
