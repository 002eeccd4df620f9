mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{campaigns, contacts, lists, logs, smtp, templates, Context};
use crate::error::{exit_code_for, report_error};
use mailcamp_config as config;
use mailcamp_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "mailcamp", version, about = "mailcamp CLI")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Contact(contacts::ContactCommand),
    #[command(subcommand)]
    List(lists::ListCommand),
    #[command(subcommand)]
    Template(templates::TemplateCommand),
    #[command(subcommand)]
    Campaign(campaigns::CampaignCommand),
    #[command(subcommand)]
    Logs(logs::LogsCommand),
    #[command(subcommand)]
    Smtp(smtp::SmtpCommand),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command {
        Command::Contact(cmd) => match cmd {
            contacts::ContactCommand::Add(args) => contacts::add_contact(&ctx, args),
            contacts::ContactCommand::Edit(args) => contacts::edit_contact(&ctx, args),
            contacts::ContactCommand::Show(args) => contacts::show_contact(&ctx, args),
            contacts::ContactCommand::Ls(args) => contacts::list_contacts(&ctx, args),
            contacts::ContactCommand::Rm(args) => contacts::delete_contact(&ctx, args),
        },
        Command::List(cmd) => match cmd {
            lists::ListCommand::Create(args) => lists::create_list(&ctx, args),
            lists::ListCommand::Add(args) => lists::add_members(&ctx, args),
            lists::ListCommand::Remove(args) => lists::remove_members(&ctx, args),
            lists::ListCommand::Show(args) => lists::show_list(&ctx, args),
            lists::ListCommand::Ls(args) => lists::list_lists(&ctx, args),
            lists::ListCommand::Rm(args) => lists::delete_list(&ctx, args),
        },
        Command::Template(cmd) => match cmd {
            templates::TemplateCommand::Add(args) => templates::add_template(&ctx, args),
            templates::TemplateCommand::Edit(args) => templates::edit_template(&ctx, args),
            templates::TemplateCommand::Show(args) => templates::show_template(&ctx, args),
            templates::TemplateCommand::Ls(args) => templates::list_templates(&ctx, args),
            templates::TemplateCommand::Rm(args) => templates::delete_template(&ctx, args),
            templates::TemplateCommand::Preview(args) => templates::preview_template(&ctx, args),
        },
        Command::Campaign(cmd) => match cmd {
            campaigns::CampaignCommand::Create(args) => campaigns::create_campaign(&ctx, args),
            campaigns::CampaignCommand::Show(args) => campaigns::show_campaign(&ctx, args),
            campaigns::CampaignCommand::Ls(args) => campaigns::list_campaigns(&ctx, args),
            campaigns::CampaignCommand::Send(args) => campaigns::send_campaign(&ctx, args),
        },
        Command::Logs(cmd) => match cmd {
            logs::LogsCommand::Ls(args) => logs::list_logs(&ctx, args),
            logs::LogsCommand::Cleanup(args) => logs::cleanup_logs(&ctx, args),
        },
        Command::Smtp(cmd) => match cmd {
            smtp::SmtpCommand::Test(args) => smtp::test_smtp(&ctx, args),
        },
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
