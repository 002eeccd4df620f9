use anyhow::Result;
use mailcamp_config::AppConfig;
use mailcamp_store::Store;
use serde::Serialize;
use std::io::{self, Write};

pub mod campaigns;
pub mod contacts;
pub mod lists;
pub mod logs;
pub mod smtp;
pub mod templates;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
