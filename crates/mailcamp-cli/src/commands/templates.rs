use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{now_utc, read_text_file};
use anyhow::Result;
use clap::{ArgAction, Args, Subcommand};
use mailcamp_core::render_template;
use mailcamp_store::repo::{TemplateNew, TemplateUpdate};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    Add(AddTemplateArgs),
    Edit(EditTemplateArgs),
    Show(ShowTemplateArgs),
    Ls(ListTemplatesArgs),
    Rm(DeleteTemplateArgs),
    /// Render a template for one contact without sending
    Preview(PreviewTemplateArgs),
}

#[derive(Debug, Args)]
pub struct AddTemplateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub subject: String,
    #[arg(long)]
    pub body_file: PathBuf,
    #[arg(long)]
    pub html_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EditTemplateArgs {
    pub name: String,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub body_file: Option<PathBuf>,
    #[arg(long, conflicts_with = "clear_html")]
    pub html_file: Option<PathBuf>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub clear_html: bool,
}

#[derive(Debug, Args)]
pub struct ShowTemplateArgs {
    pub name: String,
}

#[derive(Debug, Args)]
pub struct ListTemplatesArgs {}

#[derive(Debug, Args)]
pub struct DeleteTemplateArgs {
    pub name: String,
}

#[derive(Debug, Args)]
pub struct PreviewTemplateArgs {
    pub name: String,
    #[arg(long)]
    pub contact: String,
}

pub fn add_template(ctx: &Context<'_>, args: AddTemplateArgs) -> Result<()> {
    let body = read_text_file(&args.body_file)?;
    let html_body = match args.html_file {
        Some(path) => Some(read_text_file(&path)?),
        None => None,
    };
    let template = ctx.store.templates().create(
        now_utc(),
        TemplateNew {
            name: args.name,
            subject: args.subject,
            body,
            html_body,
        },
    )?;

    if ctx.json {
        print_json(&template)?;
    } else {
        println!("created template {}", template.name);
    }
    Ok(())
}

pub fn edit_template(ctx: &Context<'_>, args: EditTemplateArgs) -> Result<()> {
    let mut update = TemplateUpdate {
        subject: args.subject,
        ..TemplateUpdate::default()
    };
    if let Some(path) = args.body_file {
        update.body = Some(read_text_file(&path)?);
    }
    if let Some(path) = args.html_file {
        update.html_body = Some(Some(read_text_file(&path)?));
    } else if args.clear_html {
        update.html_body = Some(None);
    }

    if update.subject.is_none() && update.body.is_none() && update.html_body.is_none() {
        return Err(invalid_input("no updates provided"));
    }

    let template = ctx.store.templates().update(now_utc(), &args.name, update)?;
    if ctx.json {
        print_json(&template)?;
    } else {
        println!("updated template {}", template.name);
    }
    Ok(())
}

pub fn show_template(ctx: &Context<'_>, args: ShowTemplateArgs) -> Result<()> {
    let template = ctx
        .store
        .templates()
        .get_by_name(&args.name)?
        .ok_or_else(|| not_found(format!("template {}", args.name.trim())))?;

    if ctx.json {
        print_json(&template)?;
        return Ok(());
    }

    println!("name: {}", template.name);
    println!("subject: {}", template.subject);
    println!("html: {}", if template.html_body.is_some() { "yes" } else { "no" });
    println!();
    println!("{}", template.body.trim_end());
    Ok(())
}

pub fn list_templates(ctx: &Context<'_>, _args: ListTemplatesArgs) -> Result<()> {
    let names = ctx.store.templates().list_names()?;
    if ctx.json {
        print_json(&names)?;
        return Ok(());
    }
    if names.is_empty() {
        println!("no templates");
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

pub fn delete_template(ctx: &Context<'_>, args: DeleteTemplateArgs) -> Result<()> {
    ctx.store.templates().delete(&args.name)?;
    if ctx.json {
        print_json(&serde_json::json!({ "name": args.name.trim(), "deleted": true }))?;
    } else {
        println!("deleted template {}", args.name.trim());
    }
    Ok(())
}

pub fn preview_template(ctx: &Context<'_>, args: PreviewTemplateArgs) -> Result<()> {
    let template = ctx
        .store
        .templates()
        .get_by_name(&args.name)?
        .ok_or_else(|| not_found(format!("template {}", args.name.trim())))?;
    let contact = ctx
        .store
        .contacts()
        .get_by_email(&args.contact)?
        .ok_or_else(|| not_found(format!("contact {}", args.contact.trim())))?;

    let rendered = render_template(&template, &contact);
    if ctx.json {
        print_json(&rendered)?;
        return Ok(());
    }

    println!("to: {}", contact.email);
    println!("subject: {}", rendered.subject);
    println!();
    println!("{}", rendered.body.trim_end());
    if let Some(html) = rendered.html_body {
        println!();
        println!("--- html ---");
        println!("{}", html.trim_end());
    }
    Ok(())
}
