use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::Result;
use clap::{Args, Subcommand};
use mailcamp_send::SmtpMailer;

#[derive(Debug, Subcommand)]
pub enum SmtpCommand {
    /// Connect to the configured server without sending
    Test(TestSmtpArgs),
}

#[derive(Debug, Args)]
pub struct TestSmtpArgs {}

pub fn test_smtp(ctx: &Context<'_>, _args: TestSmtpArgs) -> Result<()> {
    let smtp = ctx
        .config
        .smtp
        .as_ref()
        .ok_or_else(|| invalid_input("smtp is not configured"))?;
    let mailer = SmtpMailer::from_config(smtp)?;
    let connected = mailer.test_connection()?;

    if ctx.json {
        print_json(&serde_json::json!({ "host": smtp.host, "connected": connected }))?;
    } else if connected {
        println!("connected to {}", smtp.host);
    } else {
        println!("could not connect to {}", smtp.host);
    }
    if !connected {
        return Err(anyhow::anyhow!("smtp connection test failed"));
    }
    Ok(())
}
