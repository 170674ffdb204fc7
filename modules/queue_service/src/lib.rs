//! Queue Service Module
//!
//! Multi-tenant, multi-counter queue ticketing: ticket lifecycle,
//! concurrency-safe call-next, seat-presence-driven auto-call and
//! per-counter reset signalling.
//!
//! The public surface is the contract layer plus the module lifecycle;
//! transports and storage are implementation detail.

pub mod contract;
pub mod module;

pub use contract::{
    Counter, CounterPauseLog, CounterStatus, QueueApi, QueueError, Seat, SeatKind, SeatLog,
    Tenant, Ticket, TicketStatus, TimeRange,
};
pub use module::QueueServiceModule;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
