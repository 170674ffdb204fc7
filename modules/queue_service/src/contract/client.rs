//! Native client trait for in-process consumers of the queue service.
//!
//! Other modules in the same process depend on this trait instead of the
//! concrete service, keeping the module boundary transport-agnostic.

use async_trait::async_trait;
use uuid::Uuid;

use super::error::QueueError;
use super::model::{Counter, CounterPauseLog, Seat, Ticket, TicketStatus};

#[async_trait]
pub trait QueueApi: Send + Sync {
    /// Issue a new ticket at the back of a counter's queue.
    async fn issue_ticket(&self, tenant_id: Uuid, counter_id: i64) -> Result<Ticket, QueueError>;

    /// Claim the oldest waiting ticket for a counter, if any.
    async fn call_next(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> Result<Option<Ticket>, QueueError>;

    /// Apply a validated status transition to a ticket.
    async fn update_ticket_status(
        &self,
        tenant_id: Uuid,
        ticket_id: i64,
        status: TicketStatus,
    ) -> Result<Ticket, QueueError>;

    /// Record a seat occupancy reading.
    async fn update_seat_status(&self, seat_id: i64, occupied: bool) -> Result<Seat, QueueError>;

    /// Waiting tickets for a counter, oldest first.
    async fn waiting_tickets(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> Result<Vec<Ticket>, QueueError>;

    /// Pause a counter, recording the reason.
    async fn pause_counter(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        reason: &str,
    ) -> Result<CounterPauseLog, QueueError>;

    /// Resume a paused counter.
    async fn resume_counter(&self, tenant_id: Uuid, counter_id: i64)
        -> Result<Counter, QueueError>;
}
