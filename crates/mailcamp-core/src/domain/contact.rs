use crate::domain::email::validate_email;
use crate::domain::ids::ContactId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type CustomFields = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub custom_fields: CustomFields,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Contact {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_email(&self.email)?;
        for key in self.custom_fields.keys() {
            validate_field_key(key)?;
        }
        Ok(())
    }

    /// `"{first} {last}"` with surrounding whitespace removed.
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{first} {last}").trim().to_string()
    }
}

/// Custom field keys are addressed as `{{custom.<key>}}`, so they may not be
/// empty, contain whitespace, or contain braces.
pub fn validate_field_key(key: &str) -> Result<(), CoreError> {
    if key.is_empty()
        || key
            .chars()
            .any(|ch| ch.is_whitespace() || ch == '{' || ch == '}')
    {
        return Err(CoreError::InvalidFieldKey(key.to_string()));
    }
    Ok(())
}

pub fn parse_field_assignment(raw: &str) -> Result<(String, String), CoreError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CoreError::InvalidFieldKey(raw.to_string()))?;
    let key = key.trim();
    validate_field_key(key)?;
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_field_assignment, Contact, CustomFields};
    use crate::domain::ContactId;

    fn contact(first: Option<&str>, last: Option<&str>) -> Contact {
        Contact {
            id: ContactId::new(),
            email: "ada@example.com".to_string(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            company: None,
            custom_fields: CustomFields::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn full_name_trims_missing_parts() {
        assert_eq!(contact(Some("Ada"), Some("Lovelace")).full_name(), "Ada Lovelace");
        assert_eq!(contact(Some("Ada"), None).full_name(), "Ada");
        assert_eq!(contact(None, Some("Lovelace")).full_name(), "Lovelace");
        assert_eq!(contact(None, None).full_name(), "");
    }

    #[test]
    fn validate_rejects_bad_field_keys() {
        let mut value = contact(None, None);
        value
            .custom_fields
            .insert("home city".to_string(), "London".to_string());
        assert!(value.validate().is_err());
    }

    #[test]
    fn parse_field_assignment_splits_on_first_equals() {
        let (key, value) = parse_field_assignment("motto = a=b").unwrap();
        assert_eq!(key, "motto");
        assert_eq!(value, "a=b");
        assert!(parse_field_assignment("novalue").is_err());
        assert!(parse_field_assignment("=value").is_err());
    }
}
