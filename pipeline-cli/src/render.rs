//! Terminal rendering: tables, detail views, boards and JSON.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use pipeline_core::{
    days_until, FollowUpUrgency, Lead, LeadColumn, LeadStage, Order, OrderColumn, OrderStage,
};

#[derive(Tabled)]
struct LeadRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "company")]
    company: String,
    #[tabled(rename = "contact")]
    contact: String,
    #[tabled(rename = "stage")]
    stage: String,
    #[tabled(rename = "follow up")]
    follow_up: String,
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "lead")]
    lead: String,
    #[tabled(rename = "stage")]
    stage: String,
    #[tabled(rename = "details")]
    details: String,
    #[tabled(rename = "courier")]
    courier: String,
    #[tabled(rename = "tracking")]
    tracking: String,
    #[tabled(rename = "created")]
    created: String,
}

#[derive(Serialize)]
struct ColumnJson<'a, R> {
    stage: &'static str,
    count: usize,
    records: &'a [&'a R],
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize JSON")?
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

pub fn print_leads(leads: &[&Lead], today: NaiveDate) {
    if leads.is_empty() {
        println!("No leads found. Add one with `pipeline lead add`.");
        return;
    }
    let rows: Vec<LeadRow> = leads.iter().map(|l| lead_row(l, today)).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

pub fn print_lead(lead: &Lead, today: NaiveDate) {
    println!("{} {}  [{}]", lead_indicator(lead.stage), lead.name.bold(), lead.id);
    println!("  stage:     {}", lead.stage);
    println!("  contact:   {}", lead.contact);
    println!("  company:   {}", lead.company);
    if let Some(interest) = &lead.product_interest {
        println!("  interest:  {interest}");
    }
    if lead.visible_follow_up().is_some() {
        println!("  follow up: {}", follow_up_cell(lead, today));
    }
    if let Some(notes) = &lead.notes {
        println!("  notes:     {notes}");
    }
    println!("  added:     {}", lead.created_at.format("%Y-%m-%d %H:%M"));
    println!("  updated:   {}", lead.updated_at.format("%Y-%m-%d %H:%M"));
}

pub fn print_lead_board(columns: &[LeadColumn<'_>], today: NaiveDate) {
    for column in columns {
        println!(
            "{} {} ({})",
            lead_indicator(column.stage),
            column.stage.label().bold(),
            column.len()
        );
        if column.is_empty() {
            println!("  {}", "no leads".bright_black());
            continue;
        }
        for lead in &column.records {
            let follow_up = lead
                .visible_follow_up()
                .map(|_| format!("  · {}", follow_up_cell(lead, today)))
                .unwrap_or_default();
            println!("  [{}] {} · {}{}", lead.id, lead.name, lead.company, follow_up);
        }
    }
}

pub fn print_lead_board_json(columns: &[LeadColumn<'_>]) -> Result<()> {
    let payload: Vec<ColumnJson<'_, Lead>> = columns
        .iter()
        .map(|c| ColumnJson {
            stage: c.stage.key(),
            count: c.len(),
            records: &c.records,
        })
        .collect();
    print_json(&payload)
}

fn lead_row(lead: &Lead, today: NaiveDate) -> LeadRow {
    LeadRow {
        id: lead.id.to_string(),
        name: lead.name.clone(),
        company: lead.company.clone(),
        contact: lead.contact.clone(),
        stage: lead.stage.to_string(),
        follow_up: follow_up_text(lead, today),
    }
}

/// `2026-10-20 (in 3 day(s))`; `-` when the stage hides the date.
///
/// Table cells use this plain form so column widths stay right.
pub fn follow_up_text(lead: &Lead, today: NaiveDate) -> String {
    let Some(date) = lead.visible_follow_up() else {
        return "-".to_string();
    };
    let days = days_until(date, today);
    let when = match FollowUpUrgency::classify(days) {
        FollowUpUrgency::Overdue => format!("overdue by {} day(s)", -days),
        FollowUpUrgency::Today => "today".to_string(),
        FollowUpUrgency::Soon | FollowUpUrgency::Upcoming => format!("in {days} day(s)"),
    };
    format!("{} ({when})", date.format("%Y-%m-%d"))
}

/// [`follow_up_text`] coloured by urgency: overdue red, today yellow, soon cyan.
pub fn follow_up_cell(lead: &Lead, today: NaiveDate) -> ColoredString {
    let text = follow_up_text(lead, today);
    let Some(date) = lead.visible_follow_up() else {
        return text.normal();
    };
    match FollowUpUrgency::for_date(date, today) {
        FollowUpUrgency::Overdue => text.red().bold(),
        FollowUpUrgency::Today => text.yellow().bold(),
        FollowUpUrgency::Soon => text.cyan(),
        FollowUpUrgency::Upcoming => text.normal(),
    }
}

fn lead_indicator(stage: LeadStage) -> ColoredString {
    match stage {
        LeadStage::New => "■".blue().bold(),
        LeadStage::Contacted => "■".magenta().bold(),
        LeadStage::Qualified => "■".bright_blue().bold(),
        LeadStage::ProposalSent => "■".yellow().bold(),
        LeadStage::Won => "■".green().bold(),
        LeadStage::Lost => "■".red().bold(),
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

pub fn print_orders(orders: &[&Order]) {
    if orders.is_empty() {
        println!("No orders found. Place one with `pipeline order add --lead <ID>`.");
        return;
    }
    let rows: Vec<OrderRow> = orders.iter().map(|o| order_row(o)).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

pub fn print_order(order: &Order) {
    println!(
        "{} {}  [{}]",
        order_indicator(order.stage),
        order.lead_name.bold(),
        order.id
    );
    println!("  stage:    {}", order.stage);
    println!("  lead:     {}", order.lead_id);
    if let Some(details) = &order.details {
        println!("  details:  {details}");
    }
    if let Some(courier) = &order.courier {
        println!("  courier:  {courier}");
    }
    if let Some(tracking) = &order.tracking_number {
        println!("  tracking: {tracking}");
    }
    println!("  created:  {}", order.created_at.format("%Y-%m-%d %H:%M"));
    println!("  updated:  {}", order.updated_at.format("%Y-%m-%d %H:%M"));
}

pub fn print_order_board(columns: &[OrderColumn<'_>]) {
    for column in columns {
        println!(
            "{} {} ({})",
            order_indicator(column.stage),
            column.stage.label().bold(),
            column.len()
        );
        if column.is_empty() {
            println!("  {}", "no orders".bright_black());
            continue;
        }
        for order in &column.records {
            let shipping = match (&order.courier, &order.tracking_number) {
                (Some(c), Some(t)) => format!("  · {c} {t}"),
                _ => String::new(),
            };
            println!("  [{}] {}{}", order.id, order.lead_name, shipping);
        }
    }
}

pub fn print_order_board_json(columns: &[OrderColumn<'_>]) -> Result<()> {
    let payload: Vec<ColumnJson<'_, Order>> = columns
        .iter()
        .map(|c| ColumnJson {
            stage: c.stage.key(),
            count: c.len(),
            records: &c.records,
        })
        .collect();
    print_json(&payload)
}

fn order_row(order: &Order) -> OrderRow {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    OrderRow {
        id: order.id.to_string(),
        lead: order.lead_name.clone(),
        stage: order.stage.to_string(),
        details: or_dash(&order.details),
        courier: or_dash(&order.courier),
        tracking: or_dash(&order.tracking_number),
        created: order.created_at.format("%Y-%m-%d").to_string(),
    }
}

fn order_indicator(stage: OrderStage) -> ColoredString {
    match stage {
        OrderStage::OrderReceived => "■".blue().bold(),
        OrderStage::InDevelopment => "■".yellow().bold(),
        OrderStage::ReadyToDispatch => "■".magenta().bold(),
        OrderStage::Dispatched => "■".green().bold(),
    }
}
