use crate::error::{Result, StoreError};
use crate::repo::{is_unique_violation, parse_id};
use mailcamp_core::domain::{
    Campaign, CampaignId, CampaignStats, CampaignStatus, ContactListId, TemplateId,
};
use rusqlite::{params, Connection};
use std::str::FromStr;

const CAMPAIGN_COLUMNS: &str = "id, name, template_id, status, total_recipients, sent_count, failed_count, created_at, updated_at, started_at, sent_at";

#[derive(Debug, Clone)]
pub struct CampaignNew {
    pub name: String,
    pub template_id: TemplateId,
    pub contact_list_ids: Vec<ContactListId>,
}

pub struct CampaignsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> CampaignsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, input: CampaignNew) -> Result<Campaign> {
        let mut contact_list_ids: Vec<ContactListId> = Vec::with_capacity(input.contact_list_ids.len());
        for id in input.contact_list_ids {
            if !contact_list_ids.contains(&id) {
                contact_list_ids.push(id);
            }
        }
        let campaign = Campaign {
            id: CampaignId::new(),
            name: input.name.trim().to_string(),
            template_id: input.template_id,
            contact_list_ids,
            status: CampaignStatus::Draft,
            total_recipients: 0,
            sent_count: 0,
            failed_count: 0,
            created_at: now_utc,
            updated_at: now_utc,
            started_at: None,
            sent_at: None,
        };
        campaign.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let inserted = tx.execute(
            "INSERT INTO campaigns (id, name, template_id, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                campaign.id.to_string(),
                campaign.name,
                campaign.template_id.to_string(),
                campaign.status.as_str(),
                campaign.created_at,
                campaign.updated_at,
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::DuplicateName {
                    kind: "campaign",
                    name: campaign.name,
                })
            }
            Err(err) => return Err(err.into()),
        }
        {
            let mut stmt = tx.prepare(
                "INSERT INTO campaign_lists (campaign_id, list_id, position) VALUES (?1, ?2, ?3);",
            )?;
            for (position, list_id) in campaign.contact_list_ids.iter().enumerate() {
                stmt.execute(params![
                    campaign.id.to_string(),
                    list_id.to_string(),
                    position as i64
                ])?;
            }
        }
        tx.commit()?;
        Ok(campaign)
    }

    pub fn get(&self, id: CampaignId) -> Result<Option<Campaign>> {
        self.find_one("id", &id.to_string())
    }

    pub fn get_by_name(&self, name: &str) -> Result<Option<Campaign>> {
        self.find_one("name", name.trim())
    }

    pub fn list_all(&self) -> Result<Vec<Campaign>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns ORDER BY created_at DESC, name ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut campaigns = Vec::new();
        while let Some(row) = rows.next()? {
            let mut campaign = campaign_from_row(row)?;
            campaign.contact_list_ids = self.list_ids(campaign.id)?;
            campaigns.push(campaign);
        }
        Ok(campaigns)
    }

    pub fn set_status(&self, now_utc: i64, id: CampaignId, status: CampaignStatus) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE campaigns SET status = ?2, updated_at = ?3 WHERE id = ?1;",
            params![id.to_string(), status.as_str(), now_utc],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("campaign {id}")));
        }
        Ok(())
    }

    /// Moves the campaign to `sending` unless a run already holds it.
    /// Returns false when another run is in progress.
    pub fn claim_for_sending(&self, now_utc: i64, id: CampaignId) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE campaigns SET status = ?2, started_at = ?3, updated_at = ?3
             WHERE id = ?1 AND status <> ?2;",
            params![id.to_string(), CampaignStatus::Sending.as_str(), now_utc],
        )?;
        if updated == 1 {
            return Ok(true);
        }
        if self.get(id)?.is_none() {
            return Err(StoreError::NotFound(format!("campaign {id}")));
        }
        Ok(false)
    }

    /// Replaces the counters of the previous run.
    pub fn save_stats(&self, now_utc: i64, id: CampaignId, stats: &CampaignStats) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE campaigns
             SET total_recipients = ?2, sent_count = ?3, failed_count = ?4, sent_at = ?5, updated_at = ?5
             WHERE id = ?1;",
            params![id.to_string(), stats.total, stats.sent, stats.failed, now_utc],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("campaign {id}")));
        }
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM campaigns WHERE name = ?1;", [name.trim()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("campaign {}", name.trim())));
        }
        Ok(())
    }

    fn find_one(&self, column: &str, value: &str) -> Result<Option<Campaign>> {
        let campaign = {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE {column} = ?1;"
            ))?;
            let mut rows = stmt.query([value])?;
            match rows.next()? {
                Some(row) => campaign_from_row(row)?,
                None => return Ok(None),
            }
        };
        let contact_list_ids = self.list_ids(campaign.id)?;
        Ok(Some(Campaign {
            contact_list_ids,
            ..campaign
        }))
    }

    fn list_ids(&self, id: CampaignId) -> Result<Vec<ContactListId>> {
        let mut stmt = self.conn.prepare(
            "SELECT list_id FROM campaign_lists WHERE campaign_id = ?1 ORDER BY position ASC;",
        )?;
        let raw = stmt
            .query_map([id.to_string()], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        raw.iter().map(|value| parse_id(value)).collect()
    }
}

fn campaign_from_row(row: &rusqlite::Row<'_>) -> Result<Campaign> {
    let id: String = row.get(0)?;
    let template_id: String = row.get(2)?;
    let status: String = row.get(3)?;
    Ok(Campaign {
        id: parse_id(&id)?,
        name: row.get(1)?,
        template_id: parse_id(&template_id)?,
        contact_list_ids: Vec::new(),
        status: CampaignStatus::from_str(&status)?,
        total_recipients: row.get(4)?,
        sent_count: row.get(5)?,
        failed_count: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        started_at: row.get(9)?,
        sent_at: row.get(10)?,
    })
}
