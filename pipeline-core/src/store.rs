//! The pipeline store: sole source of truth for leads and orders.
//!
//! # Mutation contract
//!
//! Every mutating method validates a candidate record before touching the
//! store. On error nothing changes, id sequences included. On success the
//! affected record is returned by value and `updated_at` is refreshed.
//!
//! Stage transitions are permissive: any stage can be reached from any other.
//! The only gate is the shipping requirement on dispatch stages of an order.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::{merge_optional, optional, required, LeadDraft, LeadPatch, OrderDraft, OrderPatch};
use crate::error::{PipelineError, RecordKind};
use crate::query::{LeadColumn, LeadQuery, OrderColumn, OrderQuery, StageColumn};
use crate::types::{Lead, LeadId, LeadStage, Order, OrderId, OrderStage};
use crate::validation::{
    into_result, lead_field_errors, order_lead, shipping_field_errors, validate_lead,
    validate_order,
};

/// Snapshot format version written by this build.
pub const STORE_VERSION: u32 = 1;

/// In-memory collection of leads and orders, in insertion order.
///
/// Id sequences only ever grow, so an id is never reissued after a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStore {
    pub version: u32,
    #[serde(default)]
    next_lead_seq: u64,
    #[serde(default)]
    next_order_seq: u64,
    #[serde(default)]
    leads: Vec<Lead>,
    #[serde(default)]
    orders: Vec<Order>,
}

impl Default for PipelineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStore {
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION,
            next_lead_seq: 0,
            next_order_seq: 0,
            leads: Vec::new(),
            orders: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Leads
    // -----------------------------------------------------------------------

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn lead(&self, id: &LeadId) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == *id)
    }

    /// Insert a new lead. Stage defaults to [`LeadStage::New`].
    pub fn create_lead(&mut self, draft: LeadDraft) -> Result<Lead, PipelineError> {
        into_result(lead_field_errors(&draft.name, &draft.contact, &draft.company))
            .inspect_err(log_rejected)?;

        let id = self.next_lead_id().inspect_err(log_rejected)?;
        let now = Utc::now();
        let lead = Lead {
            id,
            name: required(&draft.name),
            contact: required(&draft.contact),
            company: required(&draft.company),
            product_interest: optional(draft.product_interest.as_deref()),
            stage: draft.stage.unwrap_or_default(),
            follow_up_date: draft.follow_up_date,
            notes: optional(draft.notes.as_deref()),
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(lead = %lead.id, stage = %lead.stage, "lead created");
        self.leads.push(lead.clone());
        Ok(lead)
    }

    /// Merge `patch` into the lead. Required fields must stay non-empty.
    pub fn update_lead(&mut self, id: &LeadId, patch: LeadPatch) -> Result<Lead, PipelineError> {
        let idx = self.lead_index(id)?;
        let mut next = self.leads[idx].clone();

        if let Some(name) = patch.name.as_deref() {
            next.name = required(name);
        }
        if let Some(contact) = patch.contact.as_deref() {
            next.contact = required(contact);
        }
        if let Some(company) = patch.company.as_deref() {
            next.company = required(company);
        }
        merge_optional(&mut next.product_interest, patch.product_interest.as_deref());
        if let Some(stage) = patch.stage {
            next.stage = stage;
        }
        if let Some(date) = patch.follow_up_date {
            next.follow_up_date = date;
        }
        merge_optional(&mut next.notes, patch.notes.as_deref());

        validate_lead(&next).inspect_err(log_rejected)?;
        next.updated_at = Utc::now();
        tracing::debug!(lead = %next.id, stage = %next.stage, "lead updated");
        self.leads[idx] = next.clone();
        Ok(next)
    }

    /// Remove a lead. Orders that reference it are kept.
    pub fn delete_lead(&mut self, id: &LeadId) -> Result<Lead, PipelineError> {
        let idx = self.lead_index(id)?;
        let removed = self.leads.remove(idx);
        tracing::debug!(lead = %removed.id, "lead deleted");
        Ok(removed)
    }

    /// Move a lead to the stage named by `stage` (label or key).
    ///
    /// This is the board's drop handler: an unknown id is reported before an
    /// unknown stage.
    pub fn update_lead_stage(&mut self, id: &LeadId, stage: &str) -> Result<Lead, PipelineError> {
        self.lead_index(id)?;
        let stage: LeadStage = stage.parse()?;
        self.set_lead_stage(id, stage)
    }

    /// Typed form of [`update_lead_stage`](Self::update_lead_stage).
    pub fn set_lead_stage(&mut self, id: &LeadId, stage: LeadStage) -> Result<Lead, PipelineError> {
        let idx = self.lead_index(id)?;
        let lead = &mut self.leads[idx];
        let from = lead.stage;
        lead.stage = stage;
        lead.updated_at = Utc::now();
        tracing::debug!(lead = %lead.id, %from, to = %stage, "lead stage changed");
        Ok(lead.clone())
    }

    pub fn list_leads(&self, query: &LeadQuery) -> Vec<&Lead> {
        self.leads.iter().filter(|l| query.matches(l)).collect()
    }

    /// Leads an order can be placed for.
    pub fn won_leads(&self) -> Vec<&Lead> {
        self.list_leads(&LeadQuery::stage(LeadStage::Won))
    }

    /// Leads whose visible follow-up date is today or earlier.
    pub fn due_follow_ups(&self, today: NaiveDate) -> Vec<&Lead> {
        self.leads
            .iter()
            .filter(|l| l.visible_follow_up().is_some_and(|d| d <= today))
            .collect()
    }

    /// Every lead stage as a column, empty ones included.
    pub fn lead_board(&self, search: Option<&str>) -> Vec<LeadColumn<'_>> {
        let query = LeadQuery {
            stage: None,
            search: search.map(str::to_owned),
        };
        LeadStage::ALL
            .into_iter()
            .map(|stage| StageColumn {
                stage,
                records: self
                    .leads
                    .iter()
                    .filter(|l| l.stage == stage && query.matches(l))
                    .collect(),
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------------

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == *id)
    }

    pub fn orders_for_lead(&self, lead_id: &LeadId) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.lead_id == *lead_id).collect()
    }

    /// Place an order for a won lead, copying the lead's current name.
    pub fn create_order(&mut self, draft: OrderDraft) -> Result<Order, PipelineError> {
        let stage = draft.stage.unwrap_or_default();
        let courier = optional(draft.courier.as_deref());
        let tracking_number = optional(draft.tracking_number.as_deref());

        let lead = order_lead(
            draft.lead_id.as_ref().and_then(|id| self.lead(id)),
            draft.lead_id.is_some(),
        );
        let shipping = shipping_field_errors(stage, courier.as_deref(), tracking_number.as_deref());
        let (lead_id, lead_name) = match lead {
            Ok(lead) if shipping.is_empty() => (lead.id.clone(), lead.name.clone()),
            lead => {
                let errors = lead.err().into_iter().chain(shipping).collect();
                let err = PipelineError::Validation { errors };
                log_rejected(&err);
                return Err(err);
            }
        };

        let id = self.next_order_id().inspect_err(log_rejected)?;
        let now = Utc::now();
        let order = Order {
            id,
            lead_id,
            lead_name,
            stage,
            details: optional(draft.details.as_deref()),
            courier,
            tracking_number,
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(order = %order.id, lead = %order.lead_id, stage = %order.stage, "order created");
        self.orders.push(order.clone());
        Ok(order)
    }

    /// Merge `patch` into the order.
    ///
    /// The shipping requirement is checked against the merged record, so a
    /// patch may set the stage and the courier details together.
    pub fn update_order(&mut self, id: &OrderId, patch: OrderPatch) -> Result<Order, PipelineError> {
        let idx = self.order_index(id)?;
        let mut next = self.orders[idx].clone();

        if let Some(stage) = patch.stage {
            next.stage = stage;
        }
        merge_optional(&mut next.details, patch.details.as_deref());
        merge_optional(&mut next.courier, patch.courier.as_deref());
        merge_optional(&mut next.tracking_number, patch.tracking_number.as_deref());

        validate_order(&next).inspect_err(log_rejected)?;
        next.updated_at = Utc::now();
        tracing::debug!(order = %next.id, stage = %next.stage, "order updated");
        self.orders[idx] = next.clone();
        Ok(next)
    }

    pub fn delete_order(&mut self, id: &OrderId) -> Result<Order, PipelineError> {
        let idx = self.order_index(id)?;
        let removed = self.orders.remove(idx);
        tracing::debug!(order = %removed.id, "order deleted");
        Ok(removed)
    }

    /// Move an order to the stage named by `stage` (label or key).
    pub fn update_order_stage(&mut self, id: &OrderId, stage: &str) -> Result<Order, PipelineError> {
        self.order_index(id)?;
        let stage: OrderStage = stage.parse()?;
        self.set_order_stage(id, stage)
    }

    /// Typed form of [`update_order_stage`](Self::update_order_stage).
    pub fn set_order_stage(&mut self, id: &OrderId, stage: OrderStage) -> Result<Order, PipelineError> {
        let idx = self.order_index(id)?;
        let current = &self.orders[idx];
        into_result(shipping_field_errors(
            stage,
            current.courier.as_deref(),
            current.tracking_number.as_deref(),
        ))
        .inspect_err(log_rejected)?;

        let order = &mut self.orders[idx];
        let from = order.stage;
        order.stage = stage;
        order.updated_at = Utc::now();
        tracing::debug!(order = %order.id, %from, to = %stage, "order stage changed");
        Ok(order.clone())
    }

    pub fn list_orders(&self, query: &OrderQuery) -> Vec<&Order> {
        self.orders.iter().filter(|o| query.matches(o)).collect()
    }

    /// Every order stage as a column, empty ones included.
    pub fn order_board(&self, search: Option<&str>) -> Vec<OrderColumn<'_>> {
        let query = OrderQuery {
            stage: None,
            search: search.map(str::to_owned),
        };
        OrderStage::ALL
            .into_iter()
            .map(|stage| StageColumn {
                stage,
                records: self
                    .orders
                    .iter()
                    .filter(|o| o.stage == stage && query.matches(o))
                    .collect(),
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn lead_index(&self, id: &LeadId) -> Result<usize, PipelineError> {
        self.leads
            .iter()
            .position(|l| l.id == *id)
            .ok_or_else(|| PipelineError::LeadNotFound { id: id.0.clone() })
    }

    fn order_index(&self, id: &OrderId) -> Result<usize, PipelineError> {
        self.orders
            .iter()
            .position(|o| o.id == *id)
            .ok_or_else(|| PipelineError::OrderNotFound { id: id.0.clone() })
    }

    /// Skips any id already present, in case a hand-edited snapshot lags.
    /// The sequence only advances once a free id is found.
    fn next_lead_id(&mut self) -> Result<LeadId, PipelineError> {
        let mut seq = self.next_lead_seq;
        loop {
            seq = seq.checked_add(1).ok_or(PipelineError::IdsExhausted {
                kind: RecordKind::Lead,
            })?;
            let id = LeadId(format!("lead-{seq}"));
            if self.lead(&id).is_none() {
                self.next_lead_seq = seq;
                return Ok(id);
            }
        }
    }

    fn next_order_id(&mut self) -> Result<OrderId, PipelineError> {
        let mut seq = self.next_order_seq;
        loop {
            seq = seq.checked_add(1).ok_or(PipelineError::IdsExhausted {
                kind: RecordKind::Order,
            })?;
            let id = OrderId(format!("order-{seq}"));
            if self.order(&id).is_none() {
                self.next_order_seq = seq;
                return Ok(id);
            }
        }
    }
}

fn log_rejected(err: &PipelineError) {
    let fields: Vec<&str> = err.field_errors().iter().map(|e| e.field).collect();
    tracing::debug!(code = err.code(), ?fields, "operation rejected");
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
