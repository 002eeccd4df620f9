pub mod campaigns;
pub mod contacts;
pub mod email_logs;
pub mod lists;
pub mod templates;

pub use campaigns::{CampaignNew, CampaignsRepo};
pub use contacts::{ContactNew, ContactUpdate, ContactsRepo};
pub use email_logs::{EmailLogNew, EmailLogQuery, EmailLogsRepo, DEFAULT_LOG_LIMIT};
pub use lists::ListsRepo;
pub use templates::{TemplateNew, TemplateUpdate, TemplatesRepo};

use crate::error::{Result, StoreError};
use rusqlite::ErrorCode;
use std::str::FromStr;

pub(crate) fn parse_id<T: FromStr>(raw: &str) -> Result<T> {
    T::from_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Blank optional text is stored as NULL.
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
