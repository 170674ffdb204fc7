//! Domain layer: business logic, repository traits, events and the
//! auto-call machinery.

pub mod events;
pub mod repository;
pub mod reset;
pub mod scheduler;
pub mod service;

pub use events::{NoOpPublisher, NotificationPublisher, QueueEvent};
pub use repository::{
    CounterRepository, SeatRepository, TenantRepository, TicketRepository, TransitionOutcome,
};
pub use reset::{ResetRegistry, ResetSignal};
pub use scheduler::AutoCallScheduler;
pub use service::{Evaluation, Service};
