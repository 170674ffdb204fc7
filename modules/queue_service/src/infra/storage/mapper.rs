//! Conversions between SeaORM entities and contract models

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contract;

use super::entity;

#[derive(Debug, Error)]
pub enum MapperError {
    #[error("invalid allowed_time_ranges for tenant {tenant}: {message}")]
    TimeRanges { tenant: String, message: String },
}

impl From<entity::TicketStatus> for contract::TicketStatus {
    fn from(status: entity::TicketStatus) -> Self {
        match status {
            entity::TicketStatus::Waiting => contract::TicketStatus::Waiting,
            entity::TicketStatus::Called => contract::TicketStatus::Called,
            entity::TicketStatus::Done => contract::TicketStatus::Done,
            entity::TicketStatus::Cancelled => contract::TicketStatus::Cancelled,
            entity::TicketStatus::Transferred => contract::TicketStatus::Transferred,
        }
    }
}

impl From<contract::TicketStatus> for entity::TicketStatus {
    fn from(status: contract::TicketStatus) -> Self {
        match status {
            contract::TicketStatus::Waiting => entity::TicketStatus::Waiting,
            contract::TicketStatus::Called => entity::TicketStatus::Called,
            contract::TicketStatus::Done => entity::TicketStatus::Done,
            contract::TicketStatus::Cancelled => entity::TicketStatus::Cancelled,
            contract::TicketStatus::Transferred => entity::TicketStatus::Transferred,
        }
    }
}

impl From<entity::CounterStatus> for contract::CounterStatus {
    fn from(status: entity::CounterStatus) -> Self {
        match status {
            entity::CounterStatus::Active => contract::CounterStatus::Active,
            entity::CounterStatus::Paused => contract::CounterStatus::Paused,
        }
    }
}

impl From<contract::CounterStatus> for entity::CounterStatus {
    fn from(status: contract::CounterStatus) -> Self {
        match status {
            contract::CounterStatus::Active => entity::CounterStatus::Active,
            contract::CounterStatus::Paused => entity::CounterStatus::Paused,
        }
    }
}

impl From<entity::SeatKind> for contract::SeatKind {
    fn from(kind: entity::SeatKind) -> Self {
        match kind {
            entity::SeatKind::Officer => contract::SeatKind::Officer,
            entity::SeatKind::Client => contract::SeatKind::Client,
        }
    }
}

impl From<entity::ticket::Model> for contract::Ticket {
    fn from(model: entity::ticket::Model) -> Self {
        contract::Ticket {
            id: model.id,
            tenant_id: model.tenant_id,
            counter_id: model.counter_id,
            number: model.number,
            status: model.status.into(),
            created_at: model.created_at,
            called_at: model.called_at,
            finished_at: model.finished_at,
            rating: model.rating,
            feedback: model.feedback,
        }
    }
}

impl From<entity::counter::Model> for contract::Counter {
    fn from(model: entity::counter::Model) -> Self {
        contract::Counter {
            id: model.id,
            tenant_id: model.tenant_id,
            name: model.name,
            status: model.status.into(),
        }
    }
}

impl From<entity::counter_pause_log::Model> for contract::CounterPauseLog {
    fn from(model: entity::counter_pause_log::Model) -> Self {
        contract::CounterPauseLog {
            id: model.id,
            tenant_id: model.tenant_id,
            counter_id: model.counter_id,
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}

impl From<entity::seat::Model> for contract::Seat {
    fn from(model: entity::seat::Model) -> Self {
        contract::Seat {
            id: model.id,
            tenant_id: model.tenant_id,
            counter_id: model.counter_id,
            name: model.name,
            kind: model.kind.into(),
            occupied: model.occupied,
            last_empty_time: model.last_empty_time,
        }
    }
}

impl From<entity::seat_log::Model> for contract::SeatLog {
    fn from(model: entity::seat_log::Model) -> Self {
        contract::SeatLog {
            id: model.id,
            tenant_id: model.tenant_id,
            seat_id: model.seat_id,
            old_status: model.old_status,
            new_status: model.new_status,
            timestamp: model.timestamp,
        }
    }
}

/// Wire shape of one issuance window inside the tenants JSON column.
#[derive(Debug, Serialize, Deserialize)]
pub struct TimeRangeRaw {
    pub start: String,
    pub end: String,
}

impl TryFrom<entity::tenant::Model> for contract::Tenant {
    type Error = MapperError;

    fn try_from(model: entity::tenant::Model) -> Result<Self, Self::Error> {
        let allowed_time_ranges = match &model.allowed_time_ranges {
            Some(value) => parse_time_ranges(&model.slug, value)?,
            None => Vec::new(),
        };
        Ok(contract::Tenant {
            id: model.id,
            slug: model.slug,
            name: model.name,
            timezone: model.timezone,
            allowed_time_ranges,
        })
    }
}

fn parse_time_ranges(
    tenant: &str,
    value: &serde_json::Value,
) -> Result<Vec<contract::TimeRange>, MapperError> {
    let raw: Vec<TimeRangeRaw> =
        serde_json::from_value(value.clone()).map_err(|e| MapperError::TimeRanges {
            tenant: tenant.to_string(),
            message: e.to_string(),
        })?;
    raw.iter()
        .map(|r| {
            Ok(contract::TimeRange {
                start: parse_clock(tenant, &r.start)?,
                end: parse_clock(tenant, &r.end)?,
            })
        })
        .collect()
}

/// Accepts "HH:MM" and "HH:MM:SS".
fn parse_clock(tenant: &str, raw: &str) -> Result<chrono::NaiveTime, MapperError> {
    chrono::NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| chrono::NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| MapperError::TimeRanges {
            tenant: tenant.to_string(),
            message: format!("bad clock value {raw:?}"),
        })
}
