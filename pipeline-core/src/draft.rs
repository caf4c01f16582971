//! Typed form inputs: drafts for creation, patches for partial updates.
//!
//! String fields are trimmed at the store boundary. In a patch, `Some("")`
//! clears an optional field and `None` leaves it untouched.

use chrono::NaiveDate;

use crate::types::{LeadId, LeadStage, OrderStage};

/// Fields submitted when creating a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadDraft {
    pub name: String,
    pub contact: String,
    pub company: String,
    pub product_interest: Option<String>,
    /// Defaults to [`LeadStage::New`].
    pub stage: Option<LeadStage>,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl LeadDraft {
    pub fn new(
        name: impl Into<String>,
        contact: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            company: company.into(),
            ..Self::default()
        }
    }

    pub fn with_stage(mut self, stage: LeadStage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_product_interest(mut self, interest: impl Into<String>) -> Self {
        self.product_interest = Some(interest.into());
        self
    }

    pub fn with_follow_up(mut self, date: NaiveDate) -> Self {
        self.follow_up_date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update of a lead. Unset fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadPatch {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub company: Option<String>,
    pub product_interest: Option<String>,
    pub stage: Option<LeadStage>,
    /// `Some(None)` clears the date.
    pub follow_up_date: Option<Option<NaiveDate>>,
    pub notes: Option<String>,
}

impl LeadPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fields submitted when creating an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    /// Must name a lead currently in [`LeadStage::Won`].
    pub lead_id: Option<LeadId>,
    /// Defaults to [`OrderStage::OrderReceived`].
    pub stage: Option<OrderStage>,
    pub details: Option<String>,
    pub courier: Option<String>,
    pub tracking_number: Option<String>,
}

impl OrderDraft {
    pub fn for_lead(lead_id: impl Into<LeadId>) -> Self {
        Self {
            lead_id: Some(lead_id.into()),
            ..Self::default()
        }
    }

    pub fn with_stage(mut self, stage: OrderStage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_shipping(
        mut self,
        courier: impl Into<String>,
        tracking_number: impl Into<String>,
    ) -> Self {
        self.courier = Some(courier.into());
        self.tracking_number = Some(tracking_number.into());
        self
    }
}

/// Partial update of an order. The lead reference cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderPatch {
    pub stage: Option<OrderStage>,
    pub details: Option<String>,
    pub courier: Option<String>,
    pub tracking_number: Option<String>,
}

impl OrderPatch {
    pub fn shipping(courier: impl Into<String>, tracking_number: impl Into<String>) -> Self {
        Self {
            courier: Some(courier.into()),
            tracking_number: Some(tracking_number.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Trim a required field.
pub(crate) fn required(value: &str) -> String {
    value.trim().to_owned()
}

/// Trim an optional field; blank collapses to `None`.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Apply a patch value to an optional field.
pub(crate) fn merge_optional(current: &mut Option<String>, update: Option<&str>) {
    if let Some(value) = update {
        *current = optional(Some(value));
    }
}
