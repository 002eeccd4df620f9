use crate::error::{Result, StoreError};
use crate::repo::contacts::contact_from_row;
use crate::repo::{is_unique_violation, parse_id};
use mailcamp_core::domain::{normalize_email, Contact, ContactList, ContactListId};
use rusqlite::{params, Connection};

pub struct ListsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ListsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, name: &str, description: &str) -> Result<ContactList> {
        let name = name.trim();
        if name.is_empty() {
            return Err(mailcamp_core::CoreError::EmptyName("contact list").into());
        }
        let list = ContactList {
            id: ContactListId::new(),
            name: name.to_string(),
            description: description.trim().to_string(),
            created_at: now_utc,
        };
        let inserted = self.conn.execute(
            "INSERT INTO contact_lists (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4);",
            params![list.id.to_string(), list.name, list.description, list.created_at],
        );
        match inserted {
            Ok(_) => Ok(list),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateName {
                kind: "contact list",
                name: list.name,
            }),
            Err(err) => Err(err.into()),
        }
    }

    pub fn get(&self, id: ContactListId) -> Result<Option<ContactList>> {
        self.find_one("id", &id.to_string())
    }

    pub fn get_by_name(&self, name: &str) -> Result<Option<ContactList>> {
        self.find_one("name", name.trim())
    }

    pub fn require_by_name(&self, name: &str) -> Result<ContactList> {
        self.get_by_name(name)?
            .ok_or_else(|| StoreError::NotFound(format!("contact list {}", name.trim())))
    }

    pub fn list_with_counts(&self) -> Result<Vec<(ContactList, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id, l.name, l.description, l.created_at, COUNT(m.email) AS cnt
             FROM contact_lists l
             LEFT JOIN contact_list_members m ON m.list_id = l.id
             GROUP BY l.id, l.name, l.description, l.created_at
             ORDER BY l.name COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let list = list_from_row(row)?;
            let count: i64 = row.get(4)?;
            items.push((list, count));
        }
        Ok(items)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM contact_lists WHERE name = ?1;", [name.trim()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("contact list {}", name.trim())));
        }
        Ok(())
    }

    /// Adds the emails that belong to existing contacts; unknown emails and
    /// existing members are skipped. Returns how many members were added.
    pub fn add_members(&self, now_utc: i64, list_name: &str, emails: &[String]) -> Result<usize> {
        let list = self.require_by_name(list_name)?;
        let tx = self.conn.unchecked_transaction()?;
        let mut added = 0;
        {
            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO contact_list_members (list_id, email, added_at)
                 SELECT ?1, c.email, ?3 FROM contacts c WHERE c.email = ?2;",
            )?;
            for email in emails {
                let Some(email) = normalize_email(email) else {
                    continue;
                };
                added += insert.execute(params![list.id.to_string(), email, now_utc])?;
            }
        }
        tx.commit()?;
        Ok(added)
    }

    pub fn remove_members(&self, list_name: &str, emails: &[String]) -> Result<usize> {
        let list = self.require_by_name(list_name)?;
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0;
        {
            let mut delete = tx.prepare(
                "DELETE FROM contact_list_members WHERE list_id = ?1 AND email = ?2;",
            )?;
            for email in emails {
                let Some(email) = normalize_email(email) else {
                    continue;
                };
                removed += delete.execute(params![list.id.to_string(), email])?;
            }
        }
        tx.commit()?;
        Ok(removed)
    }

    /// Member emails in the order they were added, including members whose
    /// contact has since been deleted.
    pub fn members(&self, id: ContactListId) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT email FROM contact_list_members WHERE list_id = ?1 ORDER BY added_at ASC, rowid ASC;",
        )?;
        let emails = stmt
            .query_map([id.to_string()], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(emails)
    }

    /// Members that still resolve to a contact, in membership order.
    pub fn contacts(&self, id: ContactListId) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.email, c.first_name, c.last_name, c.company, c.custom_fields, c.created_at, c.updated_at
             FROM contact_list_members m
             INNER JOIN contacts c ON c.email = m.email
             WHERE m.list_id = ?1
             ORDER BY m.added_at ASC, m.rowid ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }

    fn find_one(&self, column: &str, value: &str) -> Result<Option<ContactList>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, description, created_at FROM contact_lists WHERE {column} = ?1;"
        ))?;
        let mut rows = stmt.query([value])?;
        match rows.next()? {
            Some(row) => Ok(Some(list_from_row(row)?)),
            None => Ok(None),
        }
    }
}

fn list_from_row(row: &rusqlite::Row<'_>) -> Result<ContactList> {
    let id: String = row.get(0)?;
    Ok(ContactList {
        id: parse_id(&id)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
    })
}
