use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{format_timestamp_datetime, now_utc};
use anyhow::{Context as _, Result};
use clap::{ArgAction, Args, Subcommand};
use mailcamp_config::DeliveryBackend;
use mailcamp_core::domain::{
    Campaign, CampaignStats, CampaignStatus, DeliveryFailure, DeliveryStatus,
};
use mailcamp_send::{Attachment, CampaignRunner, SmtpMailer, StdoutTransport, Transport};
use mailcamp_store::repo::{CampaignNew, EmailLogQuery, DEFAULT_LOG_LIMIT};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum CampaignCommand {
    Create(CreateCampaignArgs),
    Show(ShowCampaignArgs),
    Ls(ListCampaignsArgs),
    Send(SendCampaignArgs),
}

#[derive(Debug, Args)]
pub struct CreateCampaignArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub template: String,
    /// Contact list to target; repeatable
    #[arg(long = "list", value_name = "LIST", required = true)]
    pub lists: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ShowCampaignArgs {
    pub name: String,
}

#[derive(Debug, Args)]
pub struct ListCampaignsArgs {}

#[derive(Debug, Args)]
pub struct SendCampaignArgs {
    pub name: String,
    /// File to attach to every message; repeatable
    #[arg(long = "attach", value_name = "PATH")]
    pub attachments: Vec<PathBuf>,
    /// Print messages instead of delivering them
    #[arg(long, action = ArgAction::SetTrue)]
    pub stdout: bool,
}

#[derive(Debug, Serialize)]
struct CampaignDetailDto {
    name: String,
    status: CampaignStatus,
    template: Option<String>,
    lists: Vec<String>,
    total_recipients: i64,
    sent_count: i64,
    failed_count: i64,
    created_at: i64,
    started_at: Option<i64>,
    sent_at: Option<i64>,
    failures: Vec<DeliveryFailure>,
}

#[derive(Debug, Serialize)]
struct CampaignListItemDto {
    name: String,
    status: CampaignStatus,
    sent_count: i64,
    failed_count: i64,
}

#[derive(Debug, Serialize)]
struct SendReportDto<'a> {
    campaign: &'a str,
    #[serde(flatten)]
    stats: &'a CampaignStats,
}

pub fn create_campaign(ctx: &Context<'_>, args: CreateCampaignArgs) -> Result<()> {
    let template = ctx
        .store
        .templates()
        .get_by_name(&args.template)?
        .ok_or_else(|| not_found(format!("template {}", args.template.trim())))?;
    let mut contact_list_ids = Vec::with_capacity(args.lists.len());
    for name in &args.lists {
        contact_list_ids.push(ctx.store.lists().require_by_name(name)?.id);
    }

    let campaign = ctx.store.campaigns().create(
        now_utc(),
        CampaignNew {
            name: args.name,
            template_id: template.id,
            contact_list_ids,
        },
    )?;

    if ctx.json {
        print_json(&campaign)?;
    } else {
        println!("created campaign {}", campaign.name);
    }
    Ok(())
}

pub fn show_campaign(ctx: &Context<'_>, args: ShowCampaignArgs) -> Result<()> {
    let campaign = require_campaign(ctx, &args.name)?;
    let detail = campaign_detail(ctx, campaign)?;

    if ctx.json {
        print_json(&detail)?;
        return Ok(());
    }

    println!("name: {}", detail.name);
    println!("status: {}", detail.status);
    println!(
        "template: {}",
        detail.template.as_deref().unwrap_or("(deleted)")
    );
    println!("lists: {}", detail.lists.join(", "));
    println!(
        "recipients: {}  sent: {}  failed: {}",
        detail.total_recipients, detail.sent_count, detail.failed_count
    );
    println!("created: {}", format_timestamp_datetime(detail.created_at));
    match detail.sent_at {
        Some(ts) => println!("last sent: {}", format_timestamp_datetime(ts)),
        None => println!("last sent: never"),
    }
    for failure in &detail.failures {
        println!("  failed {}: {}", failure.recipient, failure.detail);
    }
    Ok(())
}

pub fn list_campaigns(ctx: &Context<'_>, _args: ListCampaignsArgs) -> Result<()> {
    let items: Vec<CampaignListItemDto> = ctx
        .store
        .campaigns()
        .list_all()?
        .into_iter()
        .map(|campaign| CampaignListItemDto {
            name: campaign.name,
            status: campaign.status,
            sent_count: campaign.sent_count,
            failed_count: campaign.failed_count,
        })
        .collect();

    if ctx.json {
        print_json(&items)?;
        return Ok(());
    }

    if items.is_empty() {
        println!("no campaigns");
        return Ok(());
    }
    for item in items {
        println!(
            "{}  {}  sent={} failed={}",
            item.name, item.status, item.sent_count, item.failed_count
        );
    }
    Ok(())
}

pub fn send_campaign(ctx: &Context<'_>, args: SendCampaignArgs) -> Result<()> {
    let mut attachments = Vec::with_capacity(args.attachments.len());
    for path in &args.attachments {
        let attachment = Attachment::from_path(path)
            .with_context(|| format!("read attachment {}", path.display()))?;
        attachments.push(attachment);
    }

    let use_stdout = args.stdout || ctx.config.delivery.backend == DeliveryBackend::Stdout;
    let stats = if use_stdout {
        run_send(ctx, &StdoutTransport, &args.name, &attachments)?
    } else {
        let smtp = ctx
            .config
            .smtp
            .as_ref()
            .ok_or_else(|| invalid_input("smtp is not configured; add [smtp] or use --stdout"))?;
        let mailer = SmtpMailer::from_config(smtp)?;
        run_send(ctx, &mailer, &args.name, &attachments)?
    };

    if ctx.json {
        print_json(&SendReportDto {
            campaign: args.name.trim(),
            stats: &stats,
        })?;
        return Ok(());
    }

    println!(
        "campaign {}: {} recipients, {} sent, {} failed",
        args.name.trim(),
        stats.total,
        stats.sent,
        stats.failed
    );
    for failure in &stats.failures {
        println!("  failed {}: {}", failure.recipient, failure.detail);
    }
    Ok(())
}

fn run_send(
    ctx: &Context<'_>,
    transport: &dyn Transport,
    name: &str,
    attachments: &[Attachment],
) -> Result<CampaignStats> {
    let runner = CampaignRunner::new(ctx.store, ctx.store, transport);
    let stats = runner
        .send(name, attachments)
        .with_context(|| format!("send campaign {}", name.trim()))?;
    Ok(stats)
}

fn require_campaign(ctx: &Context<'_>, name: &str) -> Result<Campaign> {
    ctx.store
        .campaigns()
        .get_by_name(name)?
        .ok_or_else(|| not_found(format!("campaign {}", name.trim())))
}

fn campaign_detail(ctx: &Context<'_>, campaign: Campaign) -> Result<CampaignDetailDto> {
    let template = ctx
        .store
        .templates()
        .get(campaign.template_id)?
        .map(|template| template.name);
    let mut lists = Vec::with_capacity(campaign.contact_list_ids.len());
    for id in &campaign.contact_list_ids {
        let name = match ctx.store.lists().get(*id)? {
            Some(list) => list.name,
            None => format!("{id} (deleted)"),
        };
        lists.push(name);
    }
    let failures = last_run_failures(ctx, &campaign)?;

    Ok(CampaignDetailDto {
        name: campaign.name,
        status: campaign.status,
        template,
        lists,
        total_recipients: campaign.total_recipients,
        sent_count: campaign.sent_count,
        failed_count: campaign.failed_count,
        created_at: campaign.created_at,
        started_at: campaign.started_at,
        sent_at: campaign.sent_at,
        failures,
    })
}

/// Failed deliveries logged since the most recent run started, in send order.
fn last_run_failures(ctx: &Context<'_>, campaign: &Campaign) -> Result<Vec<DeliveryFailure>> {
    let Some(started_at) = campaign.started_at else {
        return Ok(Vec::new());
    };
    let mut entries = ctx.store.email_logs().list(&EmailLogQuery {
        limit: campaign.failed_count.max(DEFAULT_LOG_LIMIT),
        status: Some(DeliveryStatus::Failed),
        campaign_id: Some(campaign.id),
        since: Some(started_at),
    })?;
    entries.reverse();
    Ok(entries
        .into_iter()
        .map(|entry| DeliveryFailure {
            recipient: entry.recipient,
            detail: entry.error.unwrap_or_default(),
        })
        .collect())
}
