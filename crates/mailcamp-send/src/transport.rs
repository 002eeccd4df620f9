use crate::error::{Result, TransportError};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub const DEFAULT_ATTACHMENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: DEFAULT_ATTACHMENT_TYPE.to_string(),
            content,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        Ok(Self::new(filename, content))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OutgoingMessage<'a> {
    pub to: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
    pub html_body: Option<&'a str>,
    pub attachments: &'a [Attachment],
}

/// One call is one delivery attempt; implementations do not retry.
pub trait Transport {
    fn send(&self, message: &OutgoingMessage<'_>) -> std::result::Result<(), TransportError>;
}

/// Prints a summary of each message instead of delivering it.
pub struct StdoutTransport;

impl Transport for StdoutTransport {
    fn send(&self, message: &OutgoingMessage<'_>) -> std::result::Result<(), TransportError> {
        let mut stdout = io::stdout().lock();
        write_summary(&mut stdout, message)
            .map_err(|err| TransportError::Other(format!("stdout: {err}")))
    }
}

fn write_summary(out: &mut impl Write, message: &OutgoingMessage<'_>) -> io::Result<()> {
    writeln!(out, "to: {}", message.to)?;
    writeln!(out, "subject: {}", message.subject)?;
    if message.html_body.is_some() {
        writeln!(out, "html: yes")?;
    }
    for attachment in message.attachments {
        writeln!(
            out,
            "attachment: {} ({} bytes)",
            attachment.filename,
            attachment.content.len()
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{}", message.body.trim_end())?;
    writeln!(out, "---")
}
