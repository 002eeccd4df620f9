pub mod campaign;
pub mod contact;
pub mod email;
pub mod email_log;
pub mod ids;
pub mod list;
pub mod template;

pub use campaign::{Campaign, CampaignStats, CampaignStatus, DeliveryFailure};
pub use contact::{parse_field_assignment, validate_field_key, Contact, CustomFields};
pub use email::{is_valid_email, normalize_email, validate_email};
pub use email_log::{DeliveryStatus, EmailLogEntry};
pub use ids::{CampaignId, ContactId, ContactListId, EmailLogId, TemplateId};
pub use list::ContactList;
pub use template::EmailTemplate;
