//! Contract models for the queue service
//!
//! Transport-agnostic domain types used for inter-module communication.
//! These are pure models without serde derives; the REST layer has its
//! own DTOs and the storage layer has its own entities.

use chrono::{DateTime, NaiveTime, Utc};
use uuid::Uuid;

/// Lifecycle state of a ticket.
///
/// Transitions only move forward: a waiting ticket can be called,
/// cancelled or transferred; a called ticket can be finished, cancelled
/// or transferred. Done, Cancelled and Transferred are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Waiting,
    Called,
    Done,
    Cancelled,
    Transferred,
}

impl TicketStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TicketStatus::Done | TicketStatus::Cancelled | TicketStatus::Transferred
        )
    }

    /// Whether `next` is a legal successor of `self`.
    ///
    /// Backward moves (e.g. `Called -> Waiting`, `Done -> Called`) are
    /// never legal, and terminal states accept nothing.
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!(
            (self, next),
            (Waiting, Called)
                | (Waiting, Cancelled)
                | (Waiting, Transferred)
                | (Called, Done)
                | (Called, Cancelled)
                | (Called, Transferred)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::Called => "called",
            TicketStatus::Done => "done",
            TicketStatus::Cancelled => "cancelled",
            TicketStatus::Transferred => "transferred",
        }
    }
}

/// A queue ticket for one visit to one counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: i64,
    pub tenant_id: Uuid,
    pub counter_id: i64,
    /// Display number, unique per (tenant, counter, local calendar day).
    pub number: i32,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, when the ticket first leaves `Waiting` for `Called`.
    pub called_at: Option<DateTime<Utc>>,
    /// Set exactly once, when the ticket reaches `Done`.
    pub finished_at: Option<DateTime<Utc>>,
    pub rating: Option<i16>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStatus {
    Active,
    Paused,
}

/// A service counter inside one tenant's office.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    pub id: i64,
    pub tenant_id: Uuid,
    pub name: String,
    pub status: CounterStatus,
}

impl Counter {
    pub fn is_active(&self) -> bool {
        self.status == CounterStatus::Active
    }
}

/// Audit record of a counter being paused by an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterPauseLog {
    pub id: i64,
    pub tenant_id: Uuid,
    pub counter_id: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Which side of the counter a seat sensor watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatKind {
    /// The staff member serving the counter.
    Officer,
    /// The citizen currently being served.
    Client,
}

/// A presence-sensed seat attached to a counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub id: i64,
    pub tenant_id: Uuid,
    pub counter_id: i64,
    pub name: String,
    pub kind: SeatKind,
    pub occupied: bool,
    /// Last moment the seat flipped from occupied to empty.
    pub last_empty_time: Option<DateTime<Utc>>,
}

/// Immutable record of one seat occupancy flip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatLog {
    pub id: i64,
    pub tenant_id: Uuid,
    pub seat_id: i64,
    pub old_status: bool,
    pub new_status: bool,
    pub timestamp: DateTime<Utc>,
}

/// Daily window during which tickets may be issued, in tenant-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// A tenant (one office) owning counters, seats and tickets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    /// IANA timezone name, e.g. "Asia/Ho_Chi_Minh".
    pub timezone: String,
    /// Empty list means issuance is always open.
    pub allowed_time_ranges: Vec<TimeRange>,
}

impl Tenant {
    /// Whether ticket issuance is open at the given tenant-local time.
    pub fn is_issuance_open(&self, local: NaiveTime) -> bool {
        self.allowed_time_ranges.is_empty()
            || self.allowed_time_ranges.iter().any(|r| r.contains(local))
    }
}
