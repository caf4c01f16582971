//! Read-side filtering for list and board views.
//!
//! Search is a case-insensitive substring match; results keep insertion order.

use crate::types::{Lead, LeadStage, Order, OrderStage};

/// Stage filter plus free-text search over leads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadQuery {
    pub stage: Option<LeadStage>,
    pub search: Option<String>,
}

impl LeadQuery {
    pub fn stage(stage: LeadStage) -> Self {
        Self {
            stage: Some(stage),
            search: None,
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            stage: None,
            search: Some(text.into()),
        }
    }

    /// Matches name, company and contact.
    pub fn matches(&self, lead: &Lead) -> bool {
        if self.stage.is_some_and(|s| s != lead.stage) {
            return false;
        }
        search_matches(
            self.search.as_deref(),
            [
                Some(lead.name.as_str()),
                Some(lead.company.as_str()),
                Some(lead.contact.as_str()),
            ],
        )
    }
}

/// Stage filter plus free-text search over orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub stage: Option<OrderStage>,
    pub search: Option<String>,
}

impl OrderQuery {
    pub fn stage(stage: OrderStage) -> Self {
        Self {
            stage: Some(stage),
            search: None,
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            stage: None,
            search: Some(text.into()),
        }
    }

    /// Matches lead name, details, courier and tracking number.
    pub fn matches(&self, order: &Order) -> bool {
        if self.stage.is_some_and(|s| s != order.stage) {
            return false;
        }
        search_matches(
            self.search.as_deref(),
            [
                Some(order.lead_name.as_str()),
                order.details.as_deref(),
                order.courier.as_deref(),
                order.tracking_number.as_deref(),
            ],
        )
    }
}

/// One kanban column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageColumn<'a, S, R> {
    pub stage: S,
    pub records: Vec<&'a R>,
}

impl<S, R> StageColumn<'_, S, R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub type LeadColumn<'a> = StageColumn<'a, LeadStage, Lead>;
pub type OrderColumn<'a> = StageColumn<'a, OrderStage, Order>;

/// Empty or absent search text matches everything. The text is not trimmed.
fn search_matches<'a>(search: Option<&str>, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
    let needle = match search {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => return true,
    };
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}
