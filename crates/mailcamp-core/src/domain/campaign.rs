use crate::domain::ids::{CampaignId, ContactListId, TemplateId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Sending,
    Sent,
    Failed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Sending => "sending",
            CampaignStatus::Sent => "sent",
            CampaignStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(CampaignStatus::Draft),
            "sending" => Ok(CampaignStatus::Sending),
            "sent" => Ok(CampaignStatus::Sent),
            "failed" => Ok(CampaignStatus::Failed),
            other => Err(CoreError::InvalidCampaignStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub template_id: TemplateId,
    pub contact_list_ids: Vec<ContactListId>,
    pub status: CampaignStatus,
    pub total_recipients: i64,
    pub sent_count: i64,
    pub failed_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
    /// Start of the most recent send run.
    pub started_at: Option<i64>,
    pub sent_at: Option<i64>,
}

impl Campaign {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyName("campaign"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFailure {
    pub recipient: String,
    pub detail: String,
}

/// Outcome of one send run. Each run starts from zero; nothing carries over
/// from earlier runs of the same campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStats {
    pub total: i64,
    pub sent: i64,
    pub failed: i64,
    pub failures: Vec<DeliveryFailure>,
}

#[cfg(test)]
mod tests {
    use super::CampaignStatus;
    use std::str::FromStr;

    #[test]
    fn campaign_status_parses_known_labels() {
        for status in [
            CampaignStatus::Draft,
            CampaignStatus::Sending,
            CampaignStatus::Sent,
            CampaignStatus::Failed,
        ] {
            assert_eq!(CampaignStatus::from_str(status.as_str()), Ok(status));
        }
        assert!(CampaignStatus::from_str("queued").is_err());
    }
}
