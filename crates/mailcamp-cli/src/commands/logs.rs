use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{days_ago_utc, format_timestamp_datetime};
use anyhow::Result;
use clap::{Args, Subcommand};
use mailcamp_core::domain::DeliveryStatus;
use mailcamp_store::repo::{EmailLogQuery, DEFAULT_LOG_LIMIT};
use serde::Serialize;

pub const DEFAULT_RETENTION_DAYS: u32 = 30;
/// A century; anything older than that predates the store.
pub const MAX_RETENTION_DAYS: u32 = 36_500;

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    Ls(ListLogsArgs),
    /// Delete entries older than the retention window
    Cleanup(CleanupLogsArgs),
}

#[derive(Debug, Args)]
pub struct ListLogsArgs {
    #[arg(long, default_value_t = DEFAULT_LOG_LIMIT)]
    pub limit: i64,
    /// sent or failed
    #[arg(long)]
    pub status: Option<DeliveryStatus>,
    #[arg(long)]
    pub campaign: Option<String>,
}

#[derive(Debug, Args)]
pub struct CleanupLogsArgs {
    #[arg(
        long,
        default_value_t = DEFAULT_RETENTION_DAYS,
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_RETENTION_DAYS))
    )]
    pub older_than_days: u32,
}

#[derive(Debug, Serialize)]
struct CleanupDto {
    older_than_days: u32,
    deleted: usize,
}

pub fn list_logs(ctx: &Context<'_>, args: ListLogsArgs) -> Result<()> {
    if args.limit <= 0 {
        return Err(invalid_input("limit must be positive"));
    }
    let campaign_id = match args.campaign.as_deref() {
        Some(name) => Some(
            ctx.store
                .campaigns()
                .get_by_name(name)?
                .ok_or_else(|| not_found(format!("campaign {}", name.trim())))?
                .id,
        ),
        None => None,
    };

    let entries = ctx.store.email_logs().list(&EmailLogQuery {
        limit: args.limit,
        status: args.status,
        campaign_id,
        since: None,
    })?;

    if ctx.json {
        print_json(&entries)?;
        return Ok(());
    }

    if entries.is_empty() {
        println!("no log entries");
        return Ok(());
    }
    for entry in entries {
        let line = format!(
            "{}  {:<6}  {}  {}",
            format_timestamp_datetime(entry.logged_at),
            entry.status.as_str(),
            entry.recipient,
            entry.subject
        );
        match entry.error {
            Some(error) => println!("{line}  ({error})"),
            None => println!("{line}"),
        }
    }
    Ok(())
}

pub fn cleanup_logs(ctx: &Context<'_>, args: CleanupLogsArgs) -> Result<()> {
    let cutoff = days_ago_utc(args.older_than_days)?;
    let deleted = ctx.store.email_logs().delete_older_than(cutoff)?;
    if ctx.json {
        print_json(&CleanupDto {
            older_than_days: args.older_than_days,
            deleted,
        })?;
    } else {
        println!("deleted {deleted} log entries");
    }
    Ok(())
}
