use crate::commands::{print_json, Context};
use crate::util::{display_or_dash, now_utc};
use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub enum ListCommand {
    Create(CreateListArgs),
    Add(MembersArgs),
    Remove(MembersArgs),
    Show(ShowListArgs),
    Ls(ListListsArgs),
    Rm(DeleteListArgs),
}

#[derive(Debug, Args)]
pub struct CreateListArgs {
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Debug, Args)]
pub struct MembersArgs {
    pub name: String,
    #[arg(required = true)]
    pub emails: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ShowListArgs {
    pub name: String,
}

#[derive(Debug, Args)]
pub struct ListListsArgs {}

#[derive(Debug, Args)]
pub struct DeleteListArgs {
    pub name: String,
}

#[derive(Debug, Serialize)]
struct ListCountDto {
    name: String,
    description: String,
    members: i64,
}

#[derive(Debug, Serialize)]
struct ListDetailDto {
    name: String,
    description: String,
    members: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MembershipChangeDto<'a> {
    list: &'a str,
    requested: usize,
    changed: usize,
}

pub fn create_list(ctx: &Context<'_>, args: CreateListArgs) -> Result<()> {
    let list = ctx
        .store
        .lists()
        .create(now_utc(), &args.name, &args.description)?;
    if ctx.json {
        print_json(&list)?;
    } else {
        println!("created list {}", list.name);
    }
    Ok(())
}

pub fn add_members(ctx: &Context<'_>, args: MembersArgs) -> Result<()> {
    let added = ctx
        .store
        .lists()
        .add_members(now_utc(), &args.name, &args.emails)?;
    let skipped = args.emails.len() - added;
    if ctx.json {
        print_json(&MembershipChangeDto {
            list: args.name.trim(),
            requested: args.emails.len(),
            changed: added,
        })?;
    } else if skipped > 0 {
        println!(
            "added {added} to {} ({skipped} skipped: unknown contact or already a member)",
            args.name.trim()
        );
    } else {
        println!("added {added} to {}", args.name.trim());
    }
    Ok(())
}

pub fn remove_members(ctx: &Context<'_>, args: MembersArgs) -> Result<()> {
    let removed = ctx.store.lists().remove_members(&args.name, &args.emails)?;
    if ctx.json {
        print_json(&MembershipChangeDto {
            list: args.name.trim(),
            requested: args.emails.len(),
            changed: removed,
        })?;
    } else {
        println!("removed {removed} from {}", args.name.trim());
    }
    Ok(())
}

pub fn show_list(ctx: &Context<'_>, args: ShowListArgs) -> Result<()> {
    let list = ctx.store.lists().require_by_name(&args.name)?;
    let members = ctx.store.lists().members(list.id)?;

    if ctx.json {
        print_json(&ListDetailDto {
            name: list.name,
            description: list.description,
            members,
        })?;
        return Ok(());
    }

    println!("name: {}", list.name);
    println!("description: {}", display_or_dash(Some(&list.description)));
    println!("members: {}", members.len());
    for email in members {
        println!("  {email}");
    }
    Ok(())
}

pub fn list_lists(ctx: &Context<'_>, _args: ListListsArgs) -> Result<()> {
    let items: Vec<ListCountDto> = ctx
        .store
        .lists()
        .list_with_counts()?
        .into_iter()
        .map(|(list, members)| ListCountDto {
            name: list.name,
            description: list.description,
            members,
        })
        .collect();

    if ctx.json {
        print_json(&items)?;
        return Ok(());
    }

    if items.is_empty() {
        println!("no lists");
        return Ok(());
    }
    for item in items {
        println!("{} ({})", item.name, item.members);
    }
    Ok(())
}

pub fn delete_list(ctx: &Context<'_>, args: DeleteListArgs) -> Result<()> {
    ctx.store.lists().delete(&args.name)?;
    if ctx.json {
        print_json(&serde_json::json!({ "name": args.name.trim(), "deleted": true }))?;
    } else {
        println!("deleted list {}", args.name.trim());
    }
    Ok(())
}
