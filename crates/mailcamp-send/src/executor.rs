use crate::transport::{Attachment, OutgoingMessage, Transport};
use mailcamp_core::domain::{Campaign, Contact, DeliveryStatus, EmailTemplate};
use mailcamp_core::render_template;
use tracing::{debug, warn};

/// Classified result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub recipient: String,
    pub subject: String,
    pub status: DeliveryStatus,
    pub detail: Option<String>,
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        self.status == DeliveryStatus::Sent
    }
}

/// Renders the template for `contact` and makes a single transport attempt.
/// Transport errors are folded into the outcome and never returned.
pub fn deliver(
    campaign: &Campaign,
    template: &EmailTemplate,
    contact: &Contact,
    attachments: &[Attachment],
    transport: &dyn Transport,
) -> DeliveryOutcome {
    let rendered = render_template(template, contact);
    let message = OutgoingMessage {
        to: &contact.email,
        subject: &rendered.subject,
        body: &rendered.body,
        html_body: rendered.html_body.as_deref(),
        attachments,
    };

    let (status, detail) = match transport.send(&message) {
        Ok(()) => {
            debug!(campaign = %campaign.name, recipient = %contact.email, "delivered");
            (DeliveryStatus::Sent, None)
        }
        Err(err) => {
            warn!(campaign = %campaign.name, recipient = %contact.email, error = %err, "delivery failed");
            (DeliveryStatus::Failed, Some(err.to_string()))
        }
    };

    DeliveryOutcome {
        recipient: contact.email.clone(),
        subject: rendered.subject,
        status,
        detail,
    }
}
