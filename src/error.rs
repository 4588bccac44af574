use serde::Serialize;
use thiserror::Error;

/// A failure local to one input row. Never aborts the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordError {
    #[error("order {order_id}: quantity {value:?} is not a number")]
    MalformedQuantity { order_id: String, value: String },

    #[error("row {row}: missing order_id")]
    MissingOrderId { row: usize },

    #[error("{file} row {row}: {message}")]
    Unreadable {
        file: String,
        row: usize,
        message: String,
    },
}

impl RecordError {
    /// Short machine-readable name, used in the rejects file.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::MalformedQuantity { .. } => "malformed_quantity",
            RecordError::MissingOrderId { .. } => "missing_order_id",
            RecordError::Unreadable { .. } => "unreadable",
        }
    }

    pub fn order_id(&self) -> Option<&str> {
        match self {
            RecordError::MalformedQuantity { order_id, .. } => Some(order_id),
            _ => None,
        }
    }
}
