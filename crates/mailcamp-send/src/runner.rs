use crate::error::{Result, SendError};
use crate::executor::deliver;
use crate::recipients::resolve_recipients;
use crate::records::{DeliveryLog, RecordStore};
use crate::transport::{Attachment, Transport};
use mailcamp_core::domain::{
    Campaign, CampaignStats, CampaignStatus, Contact, DeliveryFailure, DeliveryStatus,
    EmailTemplate,
};
use mailcamp_store::repo::EmailLogNew;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

pub type Clock = fn() -> i64;

fn system_clock() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}

/// Sends campaigns one recipient at a time through a single transport.
///
/// Setup problems (unknown campaign, missing template, unresolvable lists)
/// fail the whole run before anything is sent. Delivery problems for a
/// recipient are logged and counted, and the run carries on. A campaign
/// already in `sending` is refused with [`SendError::Busy`].
pub struct CampaignRunner<'a> {
    store: &'a dyn RecordStore,
    log: &'a dyn DeliveryLog,
    transport: &'a dyn Transport,
    clock: Clock,
}

impl<'a> CampaignRunner<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        log: &'a dyn DeliveryLog,
        transport: &'a dyn Transport,
    ) -> Self {
        Self {
            store,
            log,
            transport,
            clock: system_clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn send(&self, campaign_name: &str, attachments: &[Attachment]) -> Result<CampaignStats> {
        let name = campaign_name.trim();
        let campaign = self
            .store
            .campaign_by_name(name)?
            .ok_or_else(|| SendError::NotFound(format!("campaign {name}")))?;

        if !self.store.claim_campaign((self.clock)(), campaign.id)? {
            return Err(SendError::Busy(campaign.name));
        }
        let claim = SendClaim::new(self, &campaign);

        let (template, recipients) = self.prepare(&campaign).map_err(|err| {
            warn!(campaign = %campaign.name, error = %err, "campaign cannot start");
            err
        })?;
        info!(
            campaign = %campaign.name,
            template = %template.name,
            recipients = recipients.len(),
            "campaign started"
        );

        let stats = self
            .run(&campaign, &template, &recipients, attachments)
            .map_err(|err| {
                warn!(campaign = %campaign.name, error = %err, "campaign aborted");
                err
            })?;
        claim.release();
        info!(
            campaign = %campaign.name,
            total = stats.total,
            sent = stats.sent,
            failed = stats.failed,
            "campaign completed"
        );
        Ok(stats)
    }

    fn prepare(&self, campaign: &Campaign) -> Result<(EmailTemplate, Vec<Contact>)> {
        let template = self.store.template(campaign.template_id)?.ok_or_else(|| {
            SendError::NotFound(format!(
                "template {} for campaign {}",
                campaign.template_id, campaign.name
            ))
        })?;
        let recipients = resolve_recipients(self.store, &campaign.contact_list_ids)?;
        Ok((template, recipients))
    }

    fn run(
        &self,
        campaign: &Campaign,
        template: &EmailTemplate,
        recipients: &[Contact],
        attachments: &[Attachment],
    ) -> Result<CampaignStats> {
        let mut stats = CampaignStats {
            total: recipients.len() as i64,
            ..CampaignStats::default()
        };

        for contact in recipients {
            let outcome = deliver(campaign, template, contact, attachments, self.transport);
            self.log.record(
                (self.clock)(),
                EmailLogNew {
                    campaign_id: Some(campaign.id),
                    recipient: outcome.recipient.clone(),
                    subject: outcome.subject.clone(),
                    status: outcome.status,
                    error: outcome.detail.clone(),
                },
            )?;
            match outcome.status {
                DeliveryStatus::Sent => stats.sent += 1,
                DeliveryStatus::Failed => {
                    stats.failed += 1;
                    stats.failures.push(DeliveryFailure {
                        recipient: outcome.recipient,
                        detail: outcome.detail.unwrap_or_default(),
                    });
                }
            }
        }

        let now = (self.clock)();
        self.store.save_campaign_stats(now, campaign.id, &stats)?;
        self.store
            .set_campaign_status(now, campaign.id, CampaignStatus::Sent)?;
        Ok(stats)
    }

    fn mark_failed(&self, campaign: &Campaign) {
        if let Err(err) =
            self.store
                .set_campaign_status((self.clock)(), campaign.id, CampaignStatus::Failed)
        {
            warn!(campaign = %campaign.name, error = %err, "could not mark campaign failed");
        }
    }
}

/// Holds a campaign in `sending` for the duration of a run. Dropping it
/// without [`SendClaim::release`] marks the campaign failed, so early
/// returns and panics never leave the claim behind.
struct SendClaim<'r, 'a> {
    runner: &'r CampaignRunner<'a>,
    campaign: &'r Campaign,
    released: bool,
}

impl<'r, 'a> SendClaim<'r, 'a> {
    fn new(runner: &'r CampaignRunner<'a>, campaign: &'r Campaign) -> Self {
        Self {
            runner,
            campaign,
            released: false,
        }
    }

    /// The run already recorded its final status.
    fn release(mut self) {
        self.released = true;
    }
}

impl Drop for SendClaim<'_, '_> {
    fn drop(&mut self) {
        if !self.released {
            self.runner.mark_failed(self.campaign);
        }
    }
}
