//! `pipeline board leads|orders` — one column per stage.

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::context::StoreContext;
use crate::render;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BoardKind {
    Leads,
    Orders,
}

/// Arguments for `pipeline board`.
#[derive(Args, Debug)]
pub struct BoardArgs {
    /// Which pipeline to show.
    #[arg(value_enum)]
    pub kind: BoardKind,

    /// Only show cards matching this text.
    #[arg(long, short = 's')]
    pub search: Option<String>,

    #[arg(long)]
    pub json: bool,
}

impl BoardArgs {
    pub fn run(self, ctx: &StoreContext) -> Result<()> {
        let search = self.search.as_deref();
        match self.kind {
            BoardKind::Leads => {
                let columns = ctx.store.lead_board(search);
                if self.json {
                    return render::print_lead_board_json(&columns);
                }
                render::print_lead_board(&columns, chrono::Local::now().date_naive());
            }
            BoardKind::Orders => {
                let columns = ctx.store.order_board(search);
                if self.json {
                    return render::print_order_board_json(&columns);
                }
                render::print_order_board(&columns);
            }
        }
        Ok(())
    }
}
