//! Error types for pipeline-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which pipeline a stage value was meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Lead,
    Order,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Lead => write!(f, "lead"),
            StageKind::Order => write!(f, "order"),
        }
    }
}

/// Which kind of record an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Lead,
    Order,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Lead => write!(f, "lead"),
            RecordKind::Order => write!(f, "order"),
        }
    }
}

/// A single rejected form field, shown beside the offending control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All errors that can arise from store operations.
///
/// A failed operation never leaves the store partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// One or more required fields are missing or inconsistent.
    #[error("validation failed: {}", join_fields(.errors))]
    Validation { errors: Vec<FieldError> },

    #[error("lead not found: {id}")]
    LeadNotFound { id: String },

    #[error("order not found: {id}")]
    OrderNotFound { id: String },

    /// The value is not one of the stages of its pipeline.
    #[error("invalid {kind} stage '{value}'")]
    InvalidStage { kind: StageKind, value: String },

    /// The id sequence read from the snapshot has no values left.
    #[error("no {kind} ids left; the store's id sequence is at its maximum")]
    IdsExhausted { kind: RecordKind },
}

impl PipelineError {
    /// Stable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Validation { .. } => "VALIDATION",
            PipelineError::LeadNotFound { .. } | PipelineError::OrderNotFound { .. } => "NOT_FOUND",
            PipelineError::InvalidStage { .. } => "INVALID_STAGE",
            PipelineError::IdsExhausted { .. } => "IDS_EXHAUSTED",
        }
    }

    /// Per-field messages for a validation failure; empty for other kinds.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            PipelineError::Validation { errors } => errors,
            _ => &[],
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors from loading or saving a store snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Underlying I/O failure (permission denied, disk full, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the offending file.
    #[error("failed to parse store at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or pass --store")]
    HomeNotFound,
}
