//! HTTP request handlers - thin layer that delegates to domain service

use crate::domain::Service;

use super::dto::*;
use super::error::{map_domain_error, Problem};
use super::mapper::ticket_status_from_str;

use axum::{extract::Path, http::StatusCode, Extension, Json};
use std::sync::Arc;
use uuid::Uuid;

// ===== Ticket Handlers =====

/// Issue a new ticket at the back of a counter's queue
pub async fn issue_ticket(
    Extension(service): Extension<Arc<Service>>,
    Path((tenant_id, counter_id)): Path<(Uuid, i64)>,
) -> Result<(StatusCode, Json<TicketDto>), Problem> {
    let ticket = service
        .issue_ticket(tenant_id, counter_id)
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(ticket.into())))
}

/// Waiting tickets for a counter, oldest first
pub async fn list_waiting_tickets(
    Extension(service): Extension<Arc<Service>>,
    Path((tenant_id, counter_id)): Path<(Uuid, i64)>,
) -> Result<Json<TicketListResponse>, Problem> {
    let tickets = service
        .waiting_tickets(tenant_id, counter_id)
        .await
        .map_err(map_domain_error)?;
    let items: Vec<TicketDto> = tickets.into_iter().map(|t| t.into()).collect();
    let total = items.len();
    Ok(Json(TicketListResponse { items, total }))
}

/// Manually call the next waiting ticket
pub async fn call_next(
    Extension(service): Extension<Arc<Service>>,
    Path((tenant_id, counter_id)): Path<(Uuid, i64)>,
) -> Result<Json<TicketDto>, Problem> {
    match service
        .call_next(tenant_id, counter_id)
        .await
        .map_err(map_domain_error)?
    {
        Some(ticket) => Ok(Json(ticket.into())),
        None => Err(
            Problem::new(StatusCode::NOT_FOUND, "No Waiting Ticket")
                .with_detail("the counter queue is empty"),
        ),
    }
}

/// Apply a status transition to a ticket
pub async fn update_ticket_status(
    Extension(service): Extension<Arc<Service>>,
    Path((tenant_id, ticket_id)): Path<(Uuid, i64)>,
    Json(request): Json<UpdateTicketStatusRequest>,
) -> Result<Json<TicketDto>, Problem> {
    let status = ticket_status_from_str(&request.status).ok_or_else(|| {
        Problem::new(StatusCode::BAD_REQUEST, "Invalid Ticket Status")
            .with_detail(format!("unknown status '{}'", request.status))
    })?;
    let ticket = service
        .update_ticket_status(tenant_id, ticket_id, status)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ticket.into()))
}

// ===== Seat Handlers =====

/// Record a seat occupancy reading
pub async fn update_seat(
    Extension(service): Extension<Arc<Service>>,
    Path(seat_id): Path<i64>,
    Json(request): Json<UpdateSeatRequest>,
) -> Result<Json<SeatDto>, Problem> {
    let seat = service
        .update_seat_status(seat_id, request.occupied)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(seat.into()))
}

// ===== Counter Handlers =====

/// Pause a counter, recording the reason
pub async fn pause_counter(
    Extension(service): Extension<Arc<Service>>,
    Path((tenant_id, counter_id)): Path<(Uuid, i64)>,
    Json(request): Json<PauseCounterRequest>,
) -> Result<Json<CounterPauseLogDto>, Problem> {
    let log = service
        .pause_counter(tenant_id, counter_id, &request.reason)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(log.into()))
}

/// Resume a paused counter
pub async fn resume_counter(
    Extension(service): Extension<Arc<Service>>,
    Path((tenant_id, counter_id)): Path<(Uuid, i64)>,
) -> Result<Json<CounterDto>, Problem> {
    let counter = service
        .resume_counter(tenant_id, counter_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(counter.into()))
}
