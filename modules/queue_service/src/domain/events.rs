//! Queue notification events.
//!
//! The core emits these through a [`NotificationPublisher`]; the actual
//! fan-out (websocket hub, message bus, display boards) lives outside
//! this module. Publishing failures are logged, never propagated: a dead
//! display board must not block the queue.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::Counter;

/// Notification emitted when a counter calls a ticket (or calls into an
/// empty queue, in which case `ticket_number` is null).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCalledEvent {
    pub ticket_number: Option<i32>,
    pub counter_id: i64,
    pub counter_name: String,
    pub tenant_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// Notification emitted when a new ticket joins a counter's queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketIssuedEvent {
    pub ticket_number: i32,
    pub counter_id: i64,
    pub counter_name: String,
    pub tenant_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum QueueEvent {
    #[serde(rename = "ticket_called")]
    TicketCalled(TicketCalledEvent),
    #[serde(rename = "new_ticket")]
    TicketIssued(TicketIssuedEvent),
}

impl QueueEvent {
    pub fn called(counter: &Counter, ticket_number: Option<i32>) -> Self {
        QueueEvent::TicketCalled(TicketCalledEvent {
            ticket_number,
            counter_id: counter.id,
            counter_name: counter.name.clone(),
            tenant_id: counter.tenant_id,
            timestamp: Utc::now(),
        })
    }

    pub fn issued(counter: &Counter, ticket_number: i32) -> Self {
        QueueEvent::TicketIssued(TicketIssuedEvent {
            ticket_number,
            counter_id: counter.id,
            counter_name: counter.name.clone(),
            tenant_id: counter.tenant_id,
            timestamp: Utc::now(),
        })
    }
}

/// Outbound notification hook.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, event: QueueEvent) -> anyhow::Result<()>;
}

/// Default publisher that drops every event.
pub struct NoOpPublisher;

#[async_trait]
impl NotificationPublisher for NoOpPublisher {
    async fn publish(&self, _event: QueueEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::CounterStatus;

    fn counter() -> Counter {
        Counter {
            id: 7,
            tenant_id: Uuid::nil(),
            name: "Counter 7".to_string(),
            status: CounterStatus::Active,
        }
    }

    #[test]
    fn called_event_serializes_with_tag() {
        let event = QueueEvent::called(&counter(), Some(12));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "ticket_called");
        assert_eq!(value["ticket_number"], 12);
        assert_eq!(value["counter_name"], "Counter 7");
    }

    #[test]
    fn empty_queue_call_serializes_null_number() {
        let event = QueueEvent::called(&counter(), None);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "ticket_called");
        assert!(value["ticket_number"].is_null());
    }

    #[test]
    fn issued_event_serializes_with_tag() {
        let event = QueueEvent::issued(&counter(), 3);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "new_ticket");
        assert_eq!(value["ticket_number"], 3);
    }
}
