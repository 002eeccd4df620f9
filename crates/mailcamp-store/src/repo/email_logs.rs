use crate::error::Result;
use crate::repo::parse_id;
use mailcamp_core::domain::{
    normalize_email, CampaignId, DeliveryStatus, EmailLogEntry, EmailLogId,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::str::FromStr;

pub const DEFAULT_LOG_LIMIT: i64 = 100;

#[derive(Debug, Clone)]
pub struct EmailLogNew {
    pub campaign_id: Option<CampaignId>,
    pub recipient: String,
    pub subject: String,
    pub status: DeliveryStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailLogQuery {
    pub limit: i64,
    pub status: Option<DeliveryStatus>,
    pub campaign_id: Option<CampaignId>,
    /// Inclusive lower bound on `logged_at`.
    pub since: Option<i64>,
}

impl Default for EmailLogQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LOG_LIMIT,
            status: None,
            campaign_id: None,
            since: None,
        }
    }
}

/// Append-only record of delivery attempts.
pub struct EmailLogsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> EmailLogsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn record(&self, now_utc: i64, input: EmailLogNew) -> Result<EmailLogEntry> {
        let entry = EmailLogEntry {
            id: EmailLogId::new(),
            campaign_id: input.campaign_id,
            recipient: normalize_email(&input.recipient).unwrap_or(input.recipient),
            subject: input.subject,
            status: input.status,
            error: match input.status {
                DeliveryStatus::Sent => None,
                DeliveryStatus::Failed => input.error,
            },
            logged_at: now_utc,
        };
        self.conn.execute(
            "INSERT INTO email_logs (id, campaign_id, recipient, subject, status, error, logged_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                entry.id.to_string(),
                entry.campaign_id.map(|id| id.to_string()),
                entry.recipient,
                entry.subject,
                entry.status.as_str(),
                entry.error,
                entry.logged_at,
            ],
        )?;
        Ok(entry)
    }

    /// Newest entries first.
    pub fn list(&self, query: &EmailLogQuery) -> Result<Vec<EmailLogEntry>> {
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(status) = query.status {
            values.push(Value::Text(status.as_str().to_string()));
            clauses.push(format!("status = ?{}", values.len()));
        }
        if let Some(campaign_id) = query.campaign_id {
            values.push(Value::Text(campaign_id.to_string()));
            clauses.push(format!("campaign_id = ?{}", values.len()));
        }
        if let Some(since) = query.since {
            values.push(Value::Integer(since));
            clauses.push(format!("logged_at >= ?{}", values.len()));
        }
        let filter = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        values.push(Value::Integer(query.limit.max(0)));
        let sql = format!(
            "SELECT id, campaign_id, recipient, subject, status, error, logged_at
             FROM email_logs {filter}
             ORDER BY logged_at DESC, rowid DESC
             LIMIT ?{};",
            values.len()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(entry_from_row(row)?);
        }
        Ok(entries)
    }

    /// Maintenance only; the send path never removes entries.
    pub fn delete_older_than(&self, cutoff_utc: i64) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM email_logs WHERE logged_at < ?1;", [cutoff_utc])?;
        Ok(deleted)
    }
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> Result<EmailLogEntry> {
    let id: String = row.get(0)?;
    let campaign_id: Option<String> = row.get(1)?;
    let status: String = row.get(4)?;
    Ok(EmailLogEntry {
        id: parse_id(&id)?,
        campaign_id: campaign_id.as_deref().map(parse_id).transpose()?,
        recipient: row.get(2)?,
        subject: row.get(3)?,
        status: DeliveryStatus::from_str(&status)?,
        error: row.get(5)?,
        logged_at: row.get(6)?,
    })
}
