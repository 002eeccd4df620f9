use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

id_type!(ContactId);
id_type!(TemplateId);
id_type!(ContactListId);
id_type!(CampaignId);
id_type!(EmailLogId);

#[cfg(test)]
mod tests {
    use super::CampaignId;
    use std::str::FromStr;

    #[test]
    fn ids_round_trip_through_strings() {
        let id = CampaignId::new();
        let parsed = CampaignId::from_str(&id.to_string()).expect("parse id");
        assert_eq!(parsed, id);
        assert!(CampaignId::from_str("not-a-uuid").is_err());
    }
}
