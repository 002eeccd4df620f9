//! The narrow views of the record store and delivery log that a send run
//! needs. [`Store`] implements both.

use mailcamp_core::domain::{
    Campaign, CampaignId, CampaignStats, CampaignStatus, Contact, ContactListId, EmailTemplate,
    TemplateId,
};
use mailcamp_store::error::Result;
use mailcamp_store::repo::EmailLogNew;
use mailcamp_store::Store;

pub trait RecordStore {
    fn campaign_by_name(&self, name: &str) -> Result<Option<Campaign>>;
    fn template(&self, id: TemplateId) -> Result<Option<EmailTemplate>>;
    /// Member emails of a list, or `None` when the list itself does not exist.
    fn list_members(&self, id: ContactListId) -> Result<Option<Vec<String>>>;
    fn contact_by_email(&self, email: &str) -> Result<Option<Contact>>;
    /// Moves the campaign to `sending`. Returns false when another run,
    /// in this process or any other sharing the store, already holds it.
    fn claim_campaign(&self, now_utc: i64, id: CampaignId) -> Result<bool>;
    fn set_campaign_status(&self, now_utc: i64, id: CampaignId, status: CampaignStatus)
        -> Result<()>;
    fn save_campaign_stats(&self, now_utc: i64, id: CampaignId, stats: &CampaignStats)
        -> Result<()>;
}

/// Append-only outcome log.
pub trait DeliveryLog {
    fn record(&self, now_utc: i64, entry: EmailLogNew) -> Result<()>;
}

impl RecordStore for Store {
    fn campaign_by_name(&self, name: &str) -> Result<Option<Campaign>> {
        self.campaigns().get_by_name(name)
    }

    fn template(&self, id: TemplateId) -> Result<Option<EmailTemplate>> {
        self.templates().get(id)
    }

    fn list_members(&self, id: ContactListId) -> Result<Option<Vec<String>>> {
        if self.lists().get(id)?.is_none() {
            return Ok(None);
        }
        self.lists().members(id).map(Some)
    }

    fn contact_by_email(&self, email: &str) -> Result<Option<Contact>> {
        self.contacts().get_by_email(email)
    }

    fn claim_campaign(&self, now_utc: i64, id: CampaignId) -> Result<bool> {
        self.campaigns().claim_for_sending(now_utc, id)
    }

    fn set_campaign_status(
        &self,
        now_utc: i64,
        id: CampaignId,
        status: CampaignStatus,
    ) -> Result<()> {
        self.campaigns().set_status(now_utc, id, status)
    }

    fn save_campaign_stats(
        &self,
        now_utc: i64,
        id: CampaignId,
        stats: &CampaignStats,
    ) -> Result<()> {
        self.campaigns().save_stats(now_utc, id, stats)
    }
}

impl DeliveryLog for Store {
    fn record(&self, now_utc: i64, entry: EmailLogNew) -> Result<()> {
        self.email_logs().record(now_utc, entry).map(|_| ())
    }
}
