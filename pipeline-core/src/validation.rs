//! Field validation shared by create and update paths.
//!
//! Each check returns every failing field at once so a form can flag all of
//! them in a single pass.

use crate::error::{FieldError, PipelineError};
use crate::types::{Lead, LeadStage, Order, OrderStage};

/// Required lead fields: name, contact, company.
pub fn lead_field_errors(name: &str, contact: &str, company: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if contact.trim().is_empty() {
        errors.push(FieldError::new("contact", "Contact information is required"));
    }
    if company.trim().is_empty() {
        errors.push(FieldError::new("company", "Company name is required"));
    }
    errors
}

/// Courier and tracking number must both be present in dispatch stages.
pub fn shipping_field_errors(
    stage: OrderStage,
    courier: Option<&str>,
    tracking_number: Option<&str>,
) -> Vec<FieldError> {
    if !stage.requires_shipping() {
        return Vec::new();
    }
    let missing = |v: Option<&str>| v.map_or(true, |s| s.trim().is_empty());
    let mut errors = Vec::new();
    if missing(courier) {
        errors.push(FieldError::new(
            "courier",
            format!("Courier is required for {} orders", stage.label().to_lowercase()),
        ));
    }
    if missing(tracking_number) {
        errors.push(FieldError::new(
            "tracking_number",
            format!(
                "Tracking number is required for {} orders",
                stage.label().to_lowercase()
            ),
        ));
    }
    errors
}

/// Order creation requires a lead that exists and is currently won.
pub fn order_lead(lead: Option<&Lead>, lead_id_given: bool) -> Result<&Lead, FieldError> {
    match lead {
        _ if !lead_id_given => Err(FieldError::new("lead_id", "Lead is required")),
        None => Err(FieldError::new("lead_id", "Lead does not exist")),
        Some(lead) if lead.stage != LeadStage::Won => Err(FieldError::new(
            "lead_id",
            format!("Lead must be Won to place an order (currently {})", lead.stage),
        )),
        Some(lead) => Ok(lead),
    }
}

pub(crate) fn validate_lead(lead: &Lead) -> Result<(), PipelineError> {
    into_result(lead_field_errors(&lead.name, &lead.contact, &lead.company))
}

pub(crate) fn validate_order(order: &Order) -> Result<(), PipelineError> {
    into_result(shipping_field_errors(
        order.stage,
        order.courier.as_deref(),
        order.tracking_number.as_deref(),
    ))
}

pub(crate) fn into_result(errors: Vec<FieldError>) -> Result<(), PipelineError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Validation { errors })
    }
}
