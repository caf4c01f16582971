//! Domain types for the sales pipeline.
//!
//! Stage enums serialize as snake_case keys and display as the labels shown on
//! board columns ("Proposal Sent", "Ready to Dispatch").

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, StageKind};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a lead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for LeadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LeadId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Position of a lead in the sales funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStage {
    #[default]
    New,
    Contacted,
    Qualified,
    ProposalSent,
    Won,
    Lost,
}

impl LeadStage {
    /// Canonical column order for boards and stage pickers.
    pub const ALL: [LeadStage; 6] = [
        LeadStage::New,
        LeadStage::Contacted,
        LeadStage::Qualified,
        LeadStage::ProposalSent,
        LeadStage::Won,
        LeadStage::Lost,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LeadStage::New => "New",
            LeadStage::Contacted => "Contacted",
            LeadStage::Qualified => "Qualified",
            LeadStage::ProposalSent => "Proposal Sent",
            LeadStage::Won => "Won",
            LeadStage::Lost => "Lost",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            LeadStage::New => "new",
            LeadStage::Contacted => "contacted",
            LeadStage::Qualified => "qualified",
            LeadStage::ProposalSent => "proposal_sent",
            LeadStage::Won => "won",
            LeadStage::Lost => "lost",
        }
    }

    /// Stages in which a follow-up date is shown.
    pub fn tracks_follow_up(self) -> bool {
        matches!(
            self,
            LeadStage::Contacted | LeadStage::Qualified | LeadStage::ProposalSent
        )
    }
}

impl fmt::Display for LeadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LeadStage {
    type Err = PipelineError;

    /// Accepts the display label or the snake_case key, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStage::ALL
            .into_iter()
            .find(|stage| stage_matches(s, stage.label(), stage.key()))
            .ok_or_else(|| PipelineError::InvalidStage {
                kind: StageKind::Lead,
                value: s.to_owned(),
            })
    }
}

/// Position of an order in fulfillment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStage {
    #[default]
    OrderReceived,
    InDevelopment,
    ReadyToDispatch,
    Dispatched,
}

impl OrderStage {
    pub const ALL: [OrderStage; 4] = [
        OrderStage::OrderReceived,
        OrderStage::InDevelopment,
        OrderStage::ReadyToDispatch,
        OrderStage::Dispatched,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OrderStage::OrderReceived => "Order Received",
            OrderStage::InDevelopment => "In Development",
            OrderStage::ReadyToDispatch => "Ready to Dispatch",
            OrderStage::Dispatched => "Dispatched",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            OrderStage::OrderReceived => "order_received",
            OrderStage::InDevelopment => "in_development",
            OrderStage::ReadyToDispatch => "ready_to_dispatch",
            OrderStage::Dispatched => "dispatched",
        }
    }

    /// Stages that cannot be entered without a courier and tracking number.
    pub fn requires_shipping(self) -> bool {
        matches!(self, OrderStage::ReadyToDispatch | OrderStage::Dispatched)
    }
}

impl fmt::Display for OrderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStage {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStage::ALL
            .into_iter()
            .find(|stage| stage_matches(s, stage.label(), stage.key()))
            .ok_or_else(|| PipelineError::InvalidStage {
                kind: StageKind::Order,
                value: s.to_owned(),
            })
    }
}

fn stage_matches(input: &str, label: &str, key: &str) -> bool {
    let input = input.trim();
    input.eq_ignore_ascii_case(label) || input.eq_ignore_ascii_case(key)
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A prospective customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub contact: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_interest: Option<String>,
    pub stage: LeadStage,
    /// Kept across stage changes; only surfaced while the stage tracks follow-ups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// The follow-up date, if the current stage displays one.
    pub fn visible_follow_up(&self) -> Option<NaiveDate> {
        if self.stage.tracks_follow_up() {
            self.follow_up_date
        } else {
            None
        }
    }
}

/// A fulfillment record for a won lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub lead_id: LeadId,
    /// Copied from the lead when the order was created; not kept in sync.
    pub lead_name: String,
    pub stage: OrderStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
