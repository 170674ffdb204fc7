//! Contract errors for the queue service
//!
//! Transport-agnostic domain errors. The REST layer maps these to
//! RFC 9457 problem responses; native callers match on them directly.

use super::model::TicketStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The referenced tenant, counter, seat or ticket does not exist.
    NotFound { resource: &'static str, id: String },
    /// The requested status change is not a legal forward transition.
    InvalidTransition {
        from: TicketStatus,
        to: TicketStatus,
    },
    /// Ticket issuance for this counter is still inside its cooldown.
    RateLimited { retry_after_secs: u64 },
    /// The operation is not allowed right now (e.g. issuance outside
    /// the tenant's service hours).
    Forbidden { reason: String },
    /// The request was well-formed but semantically invalid.
    Validation { message: String },
    /// An unexpected internal error occurred.
    Internal,
}

impl QueueError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        QueueError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        QueueError::Validation {
            message: message.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        QueueError::Forbidden {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for QueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueError::NotFound { resource, id } => {
                write!(f, "{resource} not found: {id}")
            }
            QueueError::InvalidTransition { from, to } => {
                write!(
                    f,
                    "invalid ticket transition: {} -> {}",
                    from.as_str(),
                    to.as_str()
                )
            }
            QueueError::RateLimited { retry_after_secs } => {
                write!(
                    f,
                    "ticket issuance rate limited, retry in {retry_after_secs}s"
                )
            }
            QueueError::Forbidden { reason } => write!(f, "forbidden: {reason}"),
            QueueError::Validation { message } => write!(f, "validation error: {message}"),
            QueueError::Internal => write!(f, "internal error"),
        }
    }
}

impl std::error::Error for QueueError {}
