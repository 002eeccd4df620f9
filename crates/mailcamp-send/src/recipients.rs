use crate::error::{Result, SendError};
use crate::records::RecordStore;
use mailcamp_core::domain::{normalize_email, Contact, ContactListId};
use std::collections::HashSet;
use tracing::debug;

/// Merges the membership of the given lists into one recipient per email,
/// in first-seen order. Members whose contact no longer exists are skipped.
pub fn resolve_recipients<S>(store: &S, list_ids: &[ContactListId]) -> Result<Vec<Contact>>
where
    S: RecordStore + ?Sized,
{
    if list_ids.is_empty() {
        return Err(SendError::Resolution(
            "campaign does not target any contact list".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut recipients = Vec::new();
    for list_id in list_ids {
        let members = store
            .list_members(*list_id)?
            .ok_or_else(|| SendError::Resolution(format!("contact list {list_id} does not exist")))?;

        for member in members {
            let Some(email) = normalize_email(&member) else {
                continue;
            };
            if seen.contains(&email) {
                continue;
            }
            match store.contact_by_email(&email)? {
                Some(contact) => {
                    seen.insert(email);
                    recipients.push(contact);
                }
                None => {
                    debug!(list = %list_id, email = %email, "skipping member without contact");
                }
            }
        }
    }

    Ok(recipients)
}
