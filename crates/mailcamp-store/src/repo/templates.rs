use crate::error::{Result, StoreError};
use crate::repo::{is_unique_violation, parse_id};
use mailcamp_core::domain::{EmailTemplate, TemplateId};
use rusqlite::{params, Connection};

const TEMPLATE_COLUMNS: &str = "id, name, subject, body, html_body, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct TemplateNew {
    pub name: String,
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateUpdate {
    pub subject: Option<String>,
    pub body: Option<String>,
    pub html_body: Option<Option<String>>,
}

pub struct TemplatesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> TemplatesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, input: TemplateNew) -> Result<EmailTemplate> {
        let template = EmailTemplate {
            id: TemplateId::new(),
            name: input.name.trim().to_string(),
            subject: input.subject,
            body: input.body,
            html_body: input.html_body.filter(|html| !html.trim().is_empty()),
            created_at: now_utc,
            updated_at: now_utc,
        };
        template.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO email_templates (id, name, subject, body, html_body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                template.id.to_string(),
                template.name,
                template.subject,
                template.body,
                template.html_body,
                template.created_at,
                template.updated_at,
            ],
        );
        match inserted {
            Ok(_) => Ok(template),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateName {
                kind: "template",
                name: template.name,
            }),
            Err(err) => Err(err.into()),
        }
    }

    pub fn get(&self, id: TemplateId) -> Result<Option<EmailTemplate>> {
        self.find_one("id", &id.to_string())
    }

    pub fn get_by_name(&self, name: &str) -> Result<Option<EmailTemplate>> {
        self.find_one("name", name.trim())
    }

    /// Overwrites the stored content; campaigns pick up the new content on
    /// their next send.
    pub fn update(&self, now_utc: i64, name: &str, update: TemplateUpdate) -> Result<EmailTemplate> {
        let mut template = self
            .get_by_name(name)?
            .ok_or_else(|| StoreError::NotFound(format!("template {}", name.trim())))?;
        if let Some(subject) = update.subject {
            template.subject = subject;
        }
        if let Some(body) = update.body {
            template.body = body;
        }
        if let Some(html_body) = update.html_body {
            template.html_body = html_body.filter(|html| !html.trim().is_empty());
        }
        template.updated_at = now_utc;
        template.validate()?;

        self.conn.execute(
            "UPDATE email_templates SET subject = ?2, body = ?3, html_body = ?4, updated_at = ?5
             WHERE id = ?1;",
            params![
                template.id.to_string(),
                template.subject,
                template.body,
                template.html_body,
                template.updated_at,
            ],
        )?;
        Ok(template)
    }

    pub fn list_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM email_templates ORDER BY name COLLATE NOCASE ASC;")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM email_templates WHERE name = ?1;", [name.trim()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("template {}", name.trim())));
        }
        Ok(())
    }

    fn find_one(&self, column: &str, value: &str) -> Result<Option<EmailTemplate>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM email_templates WHERE {column} = ?1;"
        ))?;
        let mut rows = stmt.query([value])?;
        match rows.next()? {
            Some(row) => Ok(Some(template_from_row(row)?)),
            None => Ok(None),
        }
    }
}

fn template_from_row(row: &rusqlite::Row<'_>) -> Result<EmailTemplate> {
    let id: String = row.get(0)?;
    Ok(EmailTemplate {
        id: parse_id(&id)?,
        name: row.get(1)?,
        subject: row.get(2)?,
        body: row.get(3)?,
        html_body: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
