use crate::error::{Result, StoreError};
use rusqlite::{Connection, OptionalExtension};

struct Migration {
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    name: "001_init.sql",
    sql: include_str!("../migrations/001_init.sql"),
}];

pub fn latest_version() -> i64 {
    MIGRATIONS.len() as i64
}

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS mailcamp_schema (version INTEGER NOT NULL);")?;
    let current = match read_version(&tx)? {
        Some(version) => version,
        None => {
            tx.execute("INSERT INTO mailcamp_schema (version) VALUES (0);", [])?;
            0
        }
    };

    if current > latest_version() {
        return Err(StoreError::Migration(format!(
            "db version {} newer than available migrations {}",
            current,
            latest_version()
        )));
    }

    for (version, migration) in (1_i64..).zip(MIGRATIONS) {
        if version <= current {
            continue;
        }
        tx.execute_batch(migration.sql).map_err(|err| {
            StoreError::Migration(format!("{} failed: {}", migration.name, err))
        })?;
        let updated = tx.execute("UPDATE mailcamp_schema SET version = ?1;", [version])?;
        if updated != 1 {
            return Err(StoreError::Migration(format!(
                "expected single schema row, updated {}",
                updated
            )));
        }
    }

    tx.commit()?;
    Ok(())
}

pub fn schema_version(conn: &Connection) -> Result<i64> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'mailcamp_schema');",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }
    Ok(read_version(conn)?.unwrap_or(0))
}

fn read_version(conn: &Connection) -> Result<Option<i64>> {
    let version = conn
        .query_row("SELECT version FROM mailcamp_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(version)
}
