//! Contract layer: transport-agnostic models, errors and the native
//! client trait.

pub mod client;
pub mod error;
pub mod model;

pub use client::QueueApi;
pub use error::QueueError;
pub use model::{
    Counter, CounterPauseLog, CounterStatus, Seat, SeatKind, SeatLog, Tenant, Ticket,
    TicketStatus, TimeRange,
};
