//! REST route table

use axum::{
    routing::{get, patch, post, put},
    Extension, Router,
};
use std::sync::Arc;

use crate::domain::Service;

use super::handlers;

/// Build the queue service router with the domain service injected.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route(
            "/tenants/{tenant_id}/counters/{counter_id}/tickets",
            post(handlers::issue_ticket),
        )
        .route(
            "/tenants/{tenant_id}/counters/{counter_id}/tickets/waiting",
            get(handlers::list_waiting_tickets),
        )
        .route(
            "/tenants/{tenant_id}/counters/{counter_id}/call-next",
            post(handlers::call_next),
        )
        .route(
            "/tenants/{tenant_id}/counters/{counter_id}/pause",
            post(handlers::pause_counter),
        )
        .route(
            "/tenants/{tenant_id}/counters/{counter_id}/resume",
            post(handlers::resume_counter),
        )
        .route(
            "/tenants/{tenant_id}/tickets/{ticket_id}/status",
            patch(handlers::update_ticket_status),
        )
        .route("/seats/{seat_id}", put(handlers::update_seat))
        .layer(Extension(service))
}
