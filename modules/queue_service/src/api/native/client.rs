//! Native in-process client
//!
//! Implements [`QueueApi`] by delegating to the domain service, so
//! sibling modules can call the queue without going through HTTP.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    Counter, CounterPauseLog, QueueApi, QueueError, Seat, Ticket, TicketStatus,
};
use crate::domain::Service;

pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl QueueApi for NativeClient {
    async fn issue_ticket(&self, tenant_id: Uuid, counter_id: i64) -> Result<Ticket, QueueError> {
        self.service.issue_ticket(tenant_id, counter_id).await
    }

    async fn call_next(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> Result<Option<Ticket>, QueueError> {
        self.service.call_next(tenant_id, counter_id).await
    }

    async fn update_ticket_status(
        &self,
        tenant_id: Uuid,
        ticket_id: i64,
        status: TicketStatus,
    ) -> Result<Ticket, QueueError> {
        self.service
            .update_ticket_status(tenant_id, ticket_id, status)
            .await
    }

    async fn update_seat_status(&self, seat_id: i64, occupied: bool) -> Result<Seat, QueueError> {
        self.service.update_seat_status(seat_id, occupied).await
    }

    async fn waiting_tickets(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> Result<Vec<Ticket>, QueueError> {
        self.service.waiting_tickets(tenant_id, counter_id).await
    }

    async fn pause_counter(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        reason: &str,
    ) -> Result<CounterPauseLog, QueueError> {
        self.service
            .pause_counter(tenant_id, counter_id, reason)
            .await
    }

    async fn resume_counter(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> Result<Counter, QueueError> {
        self.service.resume_counter(tenant_id, counter_id).await
    }
}
