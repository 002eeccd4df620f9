use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("{0} name is required")]
    EmptyName(&'static str),
    #[error("template subject is required")]
    EmptySubject,
    #[error("invalid custom field key: {0}")]
    InvalidFieldKey(String),
    #[error("unknown campaign status: {0}")]
    InvalidCampaignStatus(String),
    #[error("unknown delivery status: {0}")]
    InvalidDeliveryStatus(String),
}
