//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Ticket DTOs =====

/// Ticket response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketDto {
    pub id: i64,

    /// Tenant ID
    pub tenant_id: Uuid,

    /// Counter the ticket queues for
    pub counter_id: i64,

    /// Display number, restarts each tenant-local day
    #[schema(example = 17)]
    pub number: i32,

    /// Lifecycle state
    #[schema(example = "waiting")]
    pub status: String,

    pub created_at: chrono::DateTime<chrono::Utc>,

    pub called_at: Option<chrono::DateTime<chrono::Utc>>,

    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,

    /// Citizen satisfaction rating, 1-5
    pub rating: Option<i16>,

    pub feedback: Option<String>,
}

/// Waiting-ticket listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketListResponse {
    pub items: Vec<TicketDto>,
    pub total: usize,
}

/// Ticket status update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTicketStatusRequest {
    /// Target state
    #[schema(example = "cancelled")]
    pub status: String,
}

// ===== Seat DTOs =====

/// Seat response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeatDto {
    pub id: i64,

    pub tenant_id: Uuid,

    pub counter_id: i64,

    #[schema(example = "Officer seat 1")]
    pub name: String,

    /// "officer" or "client"
    #[schema(example = "officer")]
    pub kind: String,

    pub occupied: bool,

    /// Last occupied-to-empty flip
    pub last_empty_time: Option<chrono::DateTime<chrono::Utc>>,
}

/// Seat occupancy update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSeatRequest {
    pub occupied: bool,
}

// ===== Counter DTOs =====

/// Counter response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CounterDto {
    pub id: i64,

    pub tenant_id: Uuid,

    #[schema(example = "Counter 1")]
    pub name: String,

    /// "active" or "paused"
    #[schema(example = "active")]
    pub status: String,
}

/// Counter pause request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PauseCounterRequest {
    /// Why the counter is going offline
    #[schema(example = "lunch break")]
    pub reason: String,
}

/// Counter pause log response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CounterPauseLogDto {
    pub id: i64,

    pub counter_id: i64,

    pub reason: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}
