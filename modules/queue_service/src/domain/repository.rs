//! Repository traits for queue service persistence.
//!
//! The domain service depends on these traits; SeaORM implementations
//! live in `infra::storage`, in-memory mocks in the integration tests.
//! Operations that the contract requires to be atomic (`insert_next`,
//! `claim_next_waiting`, `finish_last_called`, `transition`,
//! `record_flip`) are single trait methods so each implementation can
//! enforce atomicity its own way.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::{
    Counter, CounterPauseLog, CounterStatus, Seat, Tenant, Ticket, TicketStatus,
};

/// Result of an atomic ticket status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The transition was legal against the stored status and applied.
    Applied(Ticket),
    NotFound,
    /// The stored status does not permit the requested transition.
    Rejected { from: TicketStatus },
}

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, tenant_id: Uuid) -> anyhow::Result<Option<Tenant>>;
}

#[async_trait]
pub trait CounterRepository: Send + Sync {
    async fn find(&self, tenant_id: Uuid, counter_id: i64) -> anyhow::Result<Option<Counter>>;

    /// All counters currently in `Active` status, across tenants.
    async fn list_active(&self) -> anyhow::Result<Vec<Counter>>;

    /// Flip a counter's status, returning the updated counter if it exists.
    async fn set_status(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        status: CounterStatus,
    ) -> anyhow::Result<Option<Counter>>;

    async fn append_pause_log(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        reason: &str,
    ) -> anyhow::Result<CounterPauseLog>;
}

#[async_trait]
pub trait SeatRepository: Send + Sync {
    async fn find_by_id(&self, seat_id: i64) -> anyhow::Result<Option<Seat>>;

    /// Seats attached to one counter (at most one officer and one client).
    async fn find_for_counter(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> anyhow::Result<Vec<Seat>>;

    /// Atomically persist a flipped occupancy value and append the
    /// matching SeatLog row; neither write survives without the other.
    /// `last_empty_time` replaces the stored value as given.
    async fn record_flip(
        &self,
        seat_id: i64,
        occupied: bool,
        last_empty_time: Option<DateTime<Utc>>,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Seat>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Insert a new waiting ticket numbered `max(number) + 1` over the
    /// counter's tickets created inside `[day_start, day_end)`.
    ///
    /// Numbering and insert happen atomically: two concurrent calls must
    /// never produce the same number.
    async fn insert_next(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Ticket>;

    /// Atomically move the oldest waiting ticket to `Called`, stamping
    /// `called_at = now`. Returns `None` when the queue is empty. Two
    /// concurrent calls must never claim the same ticket.
    async fn claim_next_waiting(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Ticket>>;

    /// Atomically move the most recently called ticket to `Done`,
    /// stamping `finished_at = now`. Returns `None` when no ticket is
    /// outstanding.
    async fn finish_last_called(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Ticket>>;

    /// Atomically apply a status transition: re-validate the requested
    /// move against the stored status under a row lock, then stamp
    /// `called_at`/`finished_at` the first time those states are
    /// reached. Two concurrent transitions must never both apply
    /// against the same stored status.
    async fn transition(
        &self,
        tenant_id: Uuid,
        ticket_id: i64,
        to: TicketStatus,
        now: DateTime<Utc>,
    ) -> anyhow::Result<TransitionOutcome>;

    /// Waiting tickets for a counter, oldest first.
    async fn list_waiting(&self, tenant_id: Uuid, counter_id: i64)
        -> anyhow::Result<Vec<Ticket>>;
}
