//! `pipeline lead add|edit|move|rm|show|list|due`

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use pipeline_core::{LeadDraft, LeadId, LeadPatch, LeadQuery, LeadStage};

use crate::context::StoreContext;
use crate::render;

/// Manage leads.
#[derive(Subcommand, Debug)]
pub enum LeadCommand {
    /// Create a lead.
    Add(AddArgs),

    /// Change fields of an existing lead.
    Edit(EditArgs),

    /// Move a lead to another stage (board drag-and-drop).
    Move {
        id: String,
        /// Target stage, e.g. "Proposal Sent" or proposal_sent.
        stage: String,
    },

    /// Delete a lead. Orders placed for it are kept.
    Rm { id: String },

    /// Show a single lead.
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },

    /// List leads, optionally filtered by stage and search text.
    List(ListArgs),

    /// Leads whose follow-up date is today or earlier.
    Due {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: Option<String>,

    /// Email or phone number.
    #[arg(long)]
    pub contact: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    /// What product or service they are interested in.
    #[arg(long)]
    pub interest: Option<String>,

    /// Initial stage. Defaults to New.
    #[arg(long)]
    pub stage: Option<LeadStage>,

    /// Follow-up date (YYYY-MM-DD).
    #[arg(long = "follow-up", value_name = "DATE")]
    pub follow_up: Option<NaiveDate>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub contact: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    /// Pass an empty string to clear.
    #[arg(long)]
    pub interest: Option<String>,

    #[arg(long)]
    pub stage: Option<LeadStage>,

    #[arg(long = "follow-up", value_name = "DATE")]
    pub follow_up: Option<NaiveDate>,

    #[arg(long, conflicts_with = "follow_up")]
    pub clear_follow_up: bool,

    /// Pass an empty string to clear.
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub stage: Option<LeadStage>,

    /// Case-insensitive match on name, company or contact.
    #[arg(long, short = 's')]
    pub search: Option<String>,

    #[arg(long)]
    pub json: bool,
}

pub fn run(ctx: &mut StoreContext, command: LeadCommand) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    match command {
        LeadCommand::Add(args) => add(ctx, args),
        LeadCommand::Edit(args) => edit(ctx, args),
        LeadCommand::Move { id, stage } => {
            let lead = ctx.store.update_lead_stage(&LeadId::from(id), &stage)?;
            ctx.commit()?;
            println!("✓ Moved '{}' to {}", lead.name, lead.stage);
            Ok(())
        }
        LeadCommand::Rm { id } => {
            let lead = ctx.store.delete_lead(&LeadId::from(id))?;
            ctx.commit()?;
            println!("✓ Deleted lead '{}' ({})", lead.name, lead.id);
            Ok(())
        }
        LeadCommand::Show { id, json } => {
            let id = LeadId::from(id);
            let lead = ctx
                .store
                .lead(&id)
                .with_context(|| format!("lead not found: {id}"))?;
            if json {
                return render::print_json(lead);
            }
            render::print_lead(lead, today);
            Ok(())
        }
        LeadCommand::List(args) => {
            let query = LeadQuery {
                stage: args.stage,
                search: args.search,
            };
            let leads = ctx.store.list_leads(&query);
            if args.json {
                return render::print_json(&leads);
            }
            render::print_leads(&leads, today);
            Ok(())
        }
        LeadCommand::Due { json } => {
            let leads = ctx.store.due_follow_ups(today);
            if json {
                return render::print_json(&leads);
            }
            render::print_leads(&leads, today);
            Ok(())
        }
    }
}

fn add(ctx: &mut StoreContext, args: AddArgs) -> Result<()> {
    let draft = LeadDraft {
        name: args.name.unwrap_or_default(),
        contact: args.contact.unwrap_or_default(),
        company: args.company.unwrap_or_default(),
        product_interest: args.interest,
        stage: args.stage,
        follow_up_date: args.follow_up,
        notes: args.notes,
    };
    let lead = ctx.store.create_lead(draft)?;
    ctx.commit()?;
    println!("✓ Created lead '{}' ({}) in {}", lead.name, lead.id, lead.stage);
    Ok(())
}

fn edit(ctx: &mut StoreContext, args: EditArgs) -> Result<()> {
    let follow_up_date = if args.clear_follow_up {
        Some(None)
    } else {
        args.follow_up.map(Some)
    };
    let patch = LeadPatch {
        name: args.name,
        contact: args.contact,
        company: args.company,
        product_interest: args.interest,
        stage: args.stage,
        follow_up_date,
        notes: args.notes,
    };
    let id = LeadId::from(args.id);
    if patch.is_empty() {
        ctx.store
            .lead(&id)
            .with_context(|| format!("lead not found: {id}"))?;
        println!("Nothing to change.");
        return Ok(());
    }
    let lead = ctx.store.update_lead(&id, patch)?;
    ctx.commit()?;
    println!("✓ Updated lead '{}' ({})", lead.name, lead.id);
    Ok(())
}
