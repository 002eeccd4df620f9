use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{display_or_dash, now_utc, parse_fields};
use anyhow::Result;
use clap::{ArgAction, Args, Subcommand};
use mailcamp_core::domain::Contact;
use mailcamp_store::repo::{ContactNew, ContactUpdate};
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    Add(AddContactArgs),
    Edit(EditContactArgs),
    Show(ShowContactArgs),
    Ls(ListContactsArgs),
    Rm(DeleteContactArgs),
}

#[derive(Debug, Args)]
pub struct AddContactArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    /// Custom field as key=value; repeatable
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

#[derive(Debug, Args)]
pub struct EditContactArgs {
    pub email: String,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    /// Set or replace a custom field; repeatable
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
    /// Drop all custom fields before applying --field
    #[arg(long, action = ArgAction::SetTrue)]
    pub clear_fields: bool,
}

#[derive(Debug, Args)]
pub struct ShowContactArgs {
    pub email: String,
}

#[derive(Debug, Args)]
pub struct ListContactsArgs {}

#[derive(Debug, Args)]
pub struct DeleteContactArgs {
    pub email: String,
}

#[derive(Debug, Serialize)]
struct ContactListItemDto {
    email: String,
    full_name: String,
    company: Option<String>,
}

pub fn add_contact(ctx: &Context<'_>, args: AddContactArgs) -> Result<()> {
    let custom_fields = parse_fields(&args.fields)?;
    let contact = ctx.store.contacts().create(
        now_utc(),
        ContactNew {
            email: args.email,
            first_name: args.first_name,
            last_name: args.last_name,
            company: args.company,
            custom_fields,
        },
    )?;

    if ctx.json {
        print_json(&contact)?;
    } else {
        println!("created {}", contact.email);
    }
    Ok(())
}

pub fn edit_contact(ctx: &Context<'_>, args: EditContactArgs) -> Result<()> {
    let mut update = ContactUpdate {
        first_name: args.first_name.map(Some),
        last_name: args.last_name.map(Some),
        company: args.company.map(Some),
        custom_fields: None,
    };

    if args.clear_fields || !args.fields.is_empty() {
        let mut fields = if args.clear_fields {
            Default::default()
        } else {
            ctx.store
                .contacts()
                .get_by_email(&args.email)?
                .ok_or_else(|| not_found(format!("contact {}", args.email.trim())))?
                .custom_fields
        };
        fields.extend(parse_fields(&args.fields)?);
        update.custom_fields = Some(fields);
    }

    if update.first_name.is_none()
        && update.last_name.is_none()
        && update.company.is_none()
        && update.custom_fields.is_none()
    {
        return Err(invalid_input("no updates provided"));
    }

    let contact = ctx.store.contacts().update(now_utc(), &args.email, update)?;
    if ctx.json {
        print_json(&contact)?;
    } else {
        println!("updated {}", contact.email);
    }
    Ok(())
}

pub fn show_contact(ctx: &Context<'_>, args: ShowContactArgs) -> Result<()> {
    let contact = ctx
        .store
        .contacts()
        .get_by_email(&args.email)?
        .ok_or_else(|| not_found(format!("contact {}", args.email.trim())))?;

    if ctx.json {
        print_json(&contact)?;
        return Ok(());
    }

    print_contact(&contact);
    Ok(())
}

pub fn list_contacts(ctx: &Context<'_>, _args: ListContactsArgs) -> Result<()> {
    let contacts = ctx.store.contacts().list_all()?;
    if ctx.json {
        let items: Vec<ContactListItemDto> = contacts
            .iter()
            .map(|contact| ContactListItemDto {
                email: contact.email.clone(),
                full_name: contact.full_name(),
                company: contact.company.clone(),
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if contacts.is_empty() {
        println!("no contacts");
        return Ok(());
    }
    for contact in contacts {
        let name = contact.full_name();
        println!(
            "{}  {}  {}",
            contact.email,
            display_or_dash(Some(&name)),
            display_or_dash(contact.company.as_deref())
        );
    }
    Ok(())
}

pub fn delete_contact(ctx: &Context<'_>, args: DeleteContactArgs) -> Result<()> {
    ctx.store.contacts().delete(&args.email)?;
    if ctx.json {
        print_json(&serde_json::json!({ "email": args.email.trim(), "deleted": true }))?;
    } else {
        println!("deleted {}", args.email.trim());
    }
    Ok(())
}

fn print_contact(contact: &Contact) {
    println!("email: {}", contact.email);
    println!("first name: {}", display_or_dash(contact.first_name.as_deref()));
    println!("last name: {}", display_or_dash(contact.last_name.as_deref()));
    println!("company: {}", display_or_dash(contact.company.as_deref()));
    if contact.custom_fields.is_empty() {
        println!("fields: -");
    } else {
        println!("fields:");
        for (key, value) in &contact.custom_fields {
            println!("  {key} = {value}");
        }
    }
}
