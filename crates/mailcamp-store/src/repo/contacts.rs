use crate::error::{Result, StoreError};
use crate::repo::{clean_optional, is_unique_violation, parse_id};
use mailcamp_core::domain::{validate_email, Contact, ContactId, CustomFields};
use mailcamp_core::normalize_email;
use rusqlite::{params, Connection, OptionalExtension};

const CONTACT_COLUMNS: &str =
    "id, email, first_name, last_name, company, custom_fields, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct ContactNew {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub custom_fields: CustomFields,
}

/// Field replacements for an existing contact. The email is the contact's key
/// and cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub company: Option<Option<String>>,
    pub custom_fields: Option<CustomFields>,
}

pub struct ContactsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ContactsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, input: ContactNew) -> Result<Contact> {
        let contact = Contact {
            id: ContactId::new(),
            email: validate_email(&input.email)?,
            first_name: clean_optional(input.first_name),
            last_name: clean_optional(input.last_name),
            company: clean_optional(input.company),
            custom_fields: input.custom_fields,
            created_at: now_utc,
            updated_at: now_utc,
        };
        contact.validate()?;

        if self.exists(&contact.email)? {
            return Err(StoreError::DuplicateEmail(contact.email));
        }

        let inserted = self.conn.execute(
            "INSERT INTO contacts (id, email, first_name, last_name, company, custom_fields, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                contact.id.to_string(),
                contact.email,
                contact.first_name,
                contact.last_name,
                contact.company,
                encode_fields(&contact.custom_fields)?,
                contact.created_at,
                contact.updated_at,
            ],
        );
        match inserted {
            Ok(_) => Ok(contact),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateEmail(contact.email)),
            Err(err) => Err(err.into()),
        }
    }

    pub fn get_by_email(&self, email: &str) -> Result<Option<Contact>> {
        let Some(email) = normalize_email(email) else {
            return Ok(None);
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE email = ?1;"
        ))?;
        let mut rows = stmt.query([email])?;
        match rows.next()? {
            Some(row) => Ok(Some(contact_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn exists(&self, email: &str) -> Result<bool> {
        let Some(email) = normalize_email(email) else {
            return Ok(false);
        };
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM contacts WHERE email = ?1;", [email], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    pub fn update(&self, now_utc: i64, email: &str, update: ContactUpdate) -> Result<Contact> {
        let mut contact = self
            .get_by_email(email)?
            .ok_or_else(|| StoreError::NotFound(format!("contact {}", email.trim())))?;

        if let Some(value) = update.first_name {
            contact.first_name = clean_optional(value);
        }
        if let Some(value) = update.last_name {
            contact.last_name = clean_optional(value);
        }
        if let Some(value) = update.company {
            contact.company = clean_optional(value);
        }
        if let Some(fields) = update.custom_fields {
            contact.custom_fields = fields;
        }
        contact.updated_at = now_utc;
        contact.validate()?;

        self.conn.execute(
            "UPDATE contacts
             SET first_name = ?2, last_name = ?3, company = ?4, custom_fields = ?5, updated_at = ?6
             WHERE id = ?1;",
            params![
                contact.id.to_string(),
                contact.first_name,
                contact.last_name,
                contact.company,
                encode_fields(&contact.custom_fields)?,
                contact.updated_at,
            ],
        )?;
        Ok(contact)
    }

    /// List memberships and delivery logs keep referring to the email.
    pub fn delete(&self, email: &str) -> Result<()> {
        let normalized = normalize_email(email).unwrap_or_default();
        let deleted = self
            .conn
            .execute("DELETE FROM contacts WHERE email = ?1;", [normalized])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("contact {}", email.trim())));
        }
        Ok(())
    }

    pub fn list_all(&self) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY email ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }
}

fn encode_fields(fields: &CustomFields) -> Result<String> {
    serde_json::to_string(fields).map_err(|err| StoreError::Corrupt(err.to_string()))
}

pub(crate) fn contact_from_row(row: &rusqlite::Row<'_>) -> Result<Contact> {
    let id: String = row.get(0)?;
    let fields_raw: String = row.get(5)?;
    let custom_fields: CustomFields = serde_json::from_str(&fields_raw)
        .map_err(|err| StoreError::Corrupt(format!("custom_fields: {err}")))?;
    Ok(Contact {
        id: parse_id(&id)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        company: row.get(4)?,
        custom_fields,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
