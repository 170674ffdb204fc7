//! Conversions between contract models and REST DTOs

use crate::contract::{Counter, CounterPauseLog, Seat, SeatKind, Ticket, TicketStatus};

use super::dto::{CounterDto, CounterPauseLogDto, SeatDto, TicketDto};

impl From<Ticket> for TicketDto {
    fn from(ticket: Ticket) -> Self {
        TicketDto {
            id: ticket.id,
            tenant_id: ticket.tenant_id,
            counter_id: ticket.counter_id,
            number: ticket.number,
            status: ticket.status.as_str().to_string(),
            created_at: ticket.created_at,
            called_at: ticket.called_at,
            finished_at: ticket.finished_at,
            rating: ticket.rating,
            feedback: ticket.feedback,
        }
    }
}

impl From<Seat> for SeatDto {
    fn from(seat: Seat) -> Self {
        SeatDto {
            id: seat.id,
            tenant_id: seat.tenant_id,
            counter_id: seat.counter_id,
            name: seat.name,
            kind: match seat.kind {
                SeatKind::Officer => "officer".to_string(),
                SeatKind::Client => "client".to_string(),
            },
            occupied: seat.occupied,
            last_empty_time: seat.last_empty_time,
        }
    }
}

impl From<Counter> for CounterDto {
    fn from(counter: Counter) -> Self {
        let status = if counter.is_active() {
            "active".to_string()
        } else {
            "paused".to_string()
        };
        CounterDto {
            id: counter.id,
            tenant_id: counter.tenant_id,
            name: counter.name,
            status,
        }
    }
}

impl From<CounterPauseLog> for CounterPauseLogDto {
    fn from(log: CounterPauseLog) -> Self {
        CounterPauseLogDto {
            id: log.id,
            counter_id: log.counter_id,
            reason: log.reason,
            created_at: log.created_at,
        }
    }
}

/// Parse a wire status value; `None` for anything unknown.
pub fn ticket_status_from_str(raw: &str) -> Option<TicketStatus> {
    match raw {
        "waiting" => Some(TicketStatus::Waiting),
        "called" => Some(TicketStatus::Called),
        "done" => Some(TicketStatus::Done),
        "cancelled" => Some(TicketStatus::Cancelled),
        "transferred" => Some(TicketStatus::Transferred),
        _ => None,
    }
}
