//! Pipeline core library: lead and order records, the stage state machines,
//! the in-memory store, and its YAML snapshot.
//!
//! - [`types`]: ids, stages and records
//! - [`draft`]: create drafts and update patches
//! - [`store`]: [`PipelineStore`], the single owner of all records
//! - [`query`]: list filters and board columns
//! - [`followup`]: follow-up urgency
//! - [`snapshot`]: load / save
//! - [`error`]: [`PipelineError`] and [`SnapshotError`]

pub mod draft;
pub mod error;
pub mod followup;
pub mod query;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod validation;

pub use draft::{LeadDraft, LeadPatch, OrderDraft, OrderPatch};
pub use error::{FieldError, PipelineError, RecordKind, SnapshotError, StageKind};
pub use followup::{days_until, FollowUpUrgency};
pub use query::{LeadColumn, LeadQuery, OrderColumn, OrderQuery, StageColumn};
pub use store::PipelineStore;
pub use types::{Lead, LeadId, LeadStage, Order, OrderId, OrderStage};
