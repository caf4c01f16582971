//! `pipeline order add|edit|move|rm|show|list|leads`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use pipeline_core::{LeadId, OrderDraft, OrderId, OrderPatch, OrderQuery, OrderStage};

use crate::context::StoreContext;
use crate::render;

/// Manage orders.
#[derive(Subcommand, Debug)]
pub enum OrderCommand {
    /// Place an order for a won lead.
    Add(AddArgs),

    /// Change fields of an existing order. The lead cannot be changed.
    Edit(EditArgs),

    /// Move an order to another stage (board drag-and-drop).
    Move {
        id: String,
        /// Target stage, e.g. "Ready to Dispatch" or dispatched.
        stage: String,
    },

    /// Delete an order.
    Rm { id: String },

    /// Show a single order.
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },

    /// List orders, optionally filtered by stage and search text.
    List(ListArgs),

    /// Won leads an order can be placed for.
    Leads {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Id of a lead in stage Won.
    #[arg(long = "lead", value_name = "LEAD_ID")]
    pub lead: Option<String>,

    /// Initial stage. Defaults to Order Received.
    #[arg(long)]
    pub stage: Option<OrderStage>,

    /// Product specifications, special requirements, etc.
    #[arg(long)]
    pub details: Option<String>,

    /// Required from Ready to Dispatch on.
    #[arg(long)]
    pub courier: Option<String>,

    /// Required from Ready to Dispatch on.
    #[arg(long = "tracking", value_name = "NUMBER")]
    pub tracking: Option<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub stage: Option<OrderStage>,

    /// Pass an empty string to clear.
    #[arg(long)]
    pub details: Option<String>,

    #[arg(long)]
    pub courier: Option<String>,

    #[arg(long = "tracking", value_name = "NUMBER")]
    pub tracking: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub stage: Option<OrderStage>,

    /// Case-insensitive match on lead name, details, courier or tracking number.
    #[arg(long, short = 's')]
    pub search: Option<String>,

    #[arg(long)]
    pub json: bool,
}

pub fn run(ctx: &mut StoreContext, command: OrderCommand) -> Result<()> {
    match command {
        OrderCommand::Add(args) => add(ctx, args),
        OrderCommand::Edit(args) => edit(ctx, args),
        OrderCommand::Move { id, stage } => {
            let order = ctx.store.update_order_stage(&OrderId::from(id), &stage)?;
            ctx.commit()?;
            println!("✓ Moved order {} to {}", order.id, order.stage);
            Ok(())
        }
        OrderCommand::Rm { id } => {
            let order = ctx.store.delete_order(&OrderId::from(id))?;
            ctx.commit()?;
            println!("✓ Deleted order {} ({})", order.id, order.lead_name);
            Ok(())
        }
        OrderCommand::Show { id, json } => {
            let id = OrderId::from(id);
            let order = ctx
                .store
                .order(&id)
                .with_context(|| format!("order not found: {id}"))?;
            if json {
                return render::print_json(order);
            }
            render::print_order(order);
            Ok(())
        }
        OrderCommand::List(args) => {
            let query = OrderQuery {
                stage: args.stage,
                search: args.search,
            };
            let orders = ctx.store.list_orders(&query);
            if args.json {
                return render::print_json(&orders);
            }
            render::print_orders(&orders);
            Ok(())
        }
        OrderCommand::Leads { json } => {
            let leads = ctx.store.won_leads();
            if json {
                return render::print_json(&leads);
            }
            if leads.is_empty() {
                println!("No won leads. Move a lead to Won first.");
                return Ok(());
            }
            for lead in leads {
                println!("  [{}] {} ({})", lead.id, lead.name, lead.company);
            }
            Ok(())
        }
    }
}

fn add(ctx: &mut StoreContext, args: AddArgs) -> Result<()> {
    let draft = OrderDraft {
        lead_id: args.lead.map(LeadId::from),
        stage: args.stage,
        details: args.details,
        courier: args.courier,
        tracking_number: args.tracking,
    };
    let order = ctx.store.create_order(draft)?;
    ctx.commit()?;
    println!(
        "✓ Created order {} for '{}' in {}",
        order.id, order.lead_name, order.stage
    );
    Ok(())
}

fn edit(ctx: &mut StoreContext, args: EditArgs) -> Result<()> {
    let id = OrderId::from(args.id);
    let patch = OrderPatch {
        stage: args.stage,
        details: args.details,
        courier: args.courier,
        tracking_number: args.tracking,
    };
    if patch.is_empty() {
        ctx.store
            .order(&id)
            .with_context(|| format!("order not found: {id}"))?;
        println!("Nothing to change.");
        return Ok(());
    }
    let order = ctx.store.update_order(&id, patch)?;
    ctx.commit()?;
    println!("✓ Updated order {} ({})", order.id, order.stage);
    Ok(())
}
