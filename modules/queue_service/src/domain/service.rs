//! Domain service: ticket lifecycle orchestration and auto-call
//! evaluation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::contract::{
    Counter, CounterPauseLog, CounterStatus, QueueError, Seat, SeatKind, Tenant, Ticket,
    TicketStatus,
};

use super::events::{NotificationPublisher, QueueEvent};
use super::repository::{
    CounterRepository, SeatRepository, TenantRepository, TicketRepository, TransitionOutcome,
};
use super::reset::ResetRegistry;

type CooldownKey = (Uuid, i64);

/// Outcome of one auto-call evaluation of a single counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Previously called ticket that was finalized as `Done`.
    pub finished: Option<Ticket>,
    /// Waiting ticket that was advanced to `Called`.
    pub called: Option<Ticket>,
}

pub struct Service {
    tenants: Arc<dyn TenantRepository>,
    counters: Arc<dyn CounterRepository>,
    seats: Arc<dyn SeatRepository>,
    tickets: Arc<dyn TicketRepository>,
    publisher: Arc<dyn NotificationPublisher>,
    resets: Arc<ResetRegistry>,
    /// Last issuance instant per (tenant, counter).
    cooldowns: RwLock<HashMap<CooldownKey, Instant>>,
    cooldown: Duration,
}

impl Service {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        counters: Arc<dyn CounterRepository>,
        seats: Arc<dyn SeatRepository>,
        tickets: Arc<dyn TicketRepository>,
        publisher: Arc<dyn NotificationPublisher>,
        resets: Arc<ResetRegistry>,
        config: &Config,
    ) -> Self {
        Self {
            tenants,
            counters,
            seats,
            tickets,
            publisher,
            resets,
            cooldowns: RwLock::new(HashMap::new()),
            cooldown: Duration::from_secs(config.issue_cooldown_secs),
        }
    }

    /// Issue a new ticket at the back of a counter's queue.
    ///
    /// Checks the tenant's service hours and the per-counter cooldown,
    /// then delegates the numbered insert to the repository, which
    /// computes `max(number) + 1` over the tenant-local calendar day
    /// atomically with the insert.
    pub async fn issue_ticket(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> Result<Ticket, QueueError> {
        let tenant = self.get_tenant(tenant_id).await?;
        let counter = self.get_counter(tenant_id, counter_id).await?;

        let tz = tenant_timezone(&tenant);
        let now = Utc::now();
        if !tenant.is_issuance_open(now.with_timezone(&tz).time()) {
            return Err(QueueError::forbidden(format!(
                "ticket issuance is outside service hours for tenant {}",
                tenant.slug
            )));
        }

        self.acquire_issue_slot(tenant_id, counter_id)?;

        let (day_start, day_end) = local_day_bounds(&tz, now);
        let ticket = self
            .tickets
            .insert_next(tenant_id, counter_id, day_start, day_end, now)
            .await
            .map_err(internal)?;

        tracing::info!(
            tenant_id = %tenant_id,
            counter = %counter.name,
            number = ticket.number,
            "ticket issued"
        );
        self.publish(QueueEvent::issued(&counter, ticket.number)).await;
        self.resets.set(tenant_id, counter_id);
        Ok(ticket)
    }

    /// Manually claim the oldest waiting ticket for a counter.
    ///
    /// Always emits a `ticket_called` notification, with a null number
    /// when the queue is empty, and always raises the counter's reset
    /// signal.
    pub async fn call_next(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> Result<Option<Ticket>, QueueError> {
        let counter = self.get_counter(tenant_id, counter_id).await?;

        let ticket = self
            .tickets
            .claim_next_waiting(tenant_id, counter_id, Utc::now())
            .await
            .map_err(internal)?;

        match &ticket {
            Some(t) => tracing::info!(
                tenant_id = %tenant_id,
                counter = %counter.name,
                number = t.number,
                "ticket called"
            ),
            None => tracing::debug!(
                tenant_id = %tenant_id,
                counter = %counter.name,
                "call-next on empty queue"
            ),
        }

        self.publish(QueueEvent::called(&counter, ticket.as_ref().map(|t| t.number)))
            .await;
        self.resets.set(tenant_id, counter_id);
        Ok(ticket)
    }

    /// Apply a validated status transition to a ticket.
    ///
    /// `called_at` and `finished_at` are stamped the first time the
    /// ticket reaches `Called` and `Done` respectively, never rewritten.
    /// The repository validates the move under a row lock, so two
    /// concurrent updates against the same stored status admit exactly
    /// one winner.
    pub async fn update_ticket_status(
        &self,
        tenant_id: Uuid,
        ticket_id: i64,
        status: TicketStatus,
    ) -> Result<Ticket, QueueError> {
        match self
            .tickets
            .transition(tenant_id, ticket_id, status, Utc::now())
            .await
            .map_err(internal)?
        {
            TransitionOutcome::Applied(ticket) => Ok(ticket),
            TransitionOutcome::NotFound => Err(QueueError::not_found("ticket", ticket_id)),
            TransitionOutcome::Rejected { from } => {
                Err(QueueError::InvalidTransition { from, to: status })
            }
        }
    }

    /// Record a seat occupancy reading.
    ///
    /// A reading equal to the stored state is a no-op: no log row, no
    /// reset. A real flip appends exactly one SeatLog row atomically
    /// with the occupancy write, stamps `last_empty_time` on
    /// occupied-to-empty, and raises the owning counter's reset signal.
    pub async fn update_seat_status(
        &self,
        seat_id: i64,
        occupied: bool,
    ) -> Result<Seat, QueueError> {
        let seat = self
            .seats
            .find_by_id(seat_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| QueueError::not_found("seat", seat_id))?;

        if seat.occupied == occupied {
            return Ok(seat);
        }

        let now = Utc::now();
        let last_empty_time = if seat.occupied && !occupied {
            Some(now)
        } else {
            seat.last_empty_time
        };

        let updated = self
            .seats
            .record_flip(seat_id, occupied, last_empty_time, now)
            .await
            .map_err(internal)?;

        tracing::debug!(
            seat_id,
            counter_id = seat.counter_id,
            occupied,
            "seat occupancy changed"
        );
        self.resets.set(seat.tenant_id, seat.counter_id);
        Ok(updated)
    }

    /// Pause a counter, recording the reason. Paused counters are
    /// skipped by the auto-call loop until resumed.
    pub async fn pause_counter(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        reason: &str,
    ) -> Result<CounterPauseLog, QueueError> {
        if reason.trim().is_empty() {
            return Err(QueueError::validation("pause reason must not be empty"));
        }
        let counter = self.get_counter(tenant_id, counter_id).await?;

        let log = self
            .counters
            .append_pause_log(tenant_id, counter_id, reason)
            .await
            .map_err(internal)?;
        self.counters
            .set_status(tenant_id, counter_id, CounterStatus::Paused)
            .await
            .map_err(internal)?;

        tracing::info!(tenant_id = %tenant_id, counter = %counter.name, reason, "counter paused");
        Ok(log)
    }

    pub async fn resume_counter(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> Result<Counter, QueueError> {
        let counter = self
            .counters
            .set_status(tenant_id, counter_id, CounterStatus::Active)
            .await
            .map_err(internal)?
            .ok_or_else(|| QueueError::not_found("counter", counter_id))?;
        tracing::info!(tenant_id = %tenant_id, counter = %counter.name, "counter resumed");
        Ok(counter)
    }

    /// Waiting tickets for a counter, oldest first.
    pub async fn waiting_tickets(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> Result<Vec<Ticket>, QueueError> {
        self.get_counter(tenant_id, counter_id).await?;
        self.tickets
            .list_waiting(tenant_id, counter_id)
            .await
            .map_err(internal)
    }

    /// Decide whether one counter should advance its queue, and do so.
    ///
    /// The counter advances only when it is active, its officer seat is
    /// occupied and its client seat is empty. Advancing finalizes the
    /// outstanding called ticket (if any) as `Done`, then claims the
    /// oldest waiting ticket.
    pub async fn evaluate_counter(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> Result<Evaluation, QueueError> {
        let counter = self.get_counter(tenant_id, counter_id).await?;
        if !counter.is_active() {
            tracing::debug!(counter = %counter.name, "counter paused, skipping auto-call");
            return Ok(Evaluation::default());
        }

        let seats = self
            .seats
            .find_for_counter(tenant_id, counter_id)
            .await
            .map_err(internal)?;
        let officer = seats.iter().find(|s| s.kind == SeatKind::Officer);
        let client = seats.iter().find(|s| s.kind == SeatKind::Client);
        let (Some(officer), Some(client)) = (officer, client) else {
            tracing::debug!(
                counter = %counter.name,
                "counter lacks an officer or client seat, skipping auto-call"
            );
            return Ok(Evaluation::default());
        };

        if !officer.occupied {
            // Nobody serving: hold the queue.
            return Ok(Evaluation::default());
        }
        if client.occupied {
            // Someone is still being served.
            return Ok(Evaluation::default());
        }

        let now = Utc::now();
        let finished = self
            .tickets
            .finish_last_called(tenant_id, counter_id, now)
            .await
            .map_err(internal)?;
        let called = self
            .tickets
            .claim_next_waiting(tenant_id, counter_id, now)
            .await
            .map_err(internal)?;

        if let Some(ticket) = &called {
            tracing::info!(
                tenant_id = %tenant_id,
                counter = %counter.name,
                number = ticket.number,
                "auto-call advanced the queue"
            );
            self.publish(QueueEvent::called(&counter, Some(ticket.number)))
                .await;
        }

        Ok(Evaluation { finished, called })
    }

    /// One auto-call pass over all active counters. A failing counter
    /// is logged and skipped; it never stops the pass.
    pub async fn evaluate_all(&self) {
        let counters = match self.counters.list_active().await {
            Ok(counters) => counters,
            Err(error) => {
                tracing::warn!(%error, "failed to list counters for auto-call pass");
                return;
            }
        };

        for counter in counters {
            if let Err(error) = self.evaluate_counter(counter.tenant_id, counter.id).await {
                tracing::warn!(
                    tenant_id = %counter.tenant_id,
                    counter_id = counter.id,
                    %error,
                    "auto-call evaluation failed"
                );
            }
        }
    }

    async fn get_tenant(&self, tenant_id: Uuid) -> Result<Tenant, QueueError> {
        self.tenants
            .find_by_id(tenant_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| QueueError::not_found("tenant", tenant_id))
    }

    async fn get_counter(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> Result<Counter, QueueError> {
        self.counters
            .find(tenant_id, counter_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| QueueError::not_found("counter", counter_id))
    }

    /// Enforce the per-counter issuance cooldown. A zero cooldown
    /// disables the check entirely.
    fn acquire_issue_slot(&self, tenant_id: Uuid, counter_id: i64) -> Result<(), QueueError> {
        if self.cooldown.is_zero() {
            return Ok(());
        }
        let mut cooldowns = self.cooldowns.write();
        if let Some(taken) = cooldowns.get(&(tenant_id, counter_id)) {
            let elapsed = taken.elapsed();
            if elapsed < self.cooldown {
                let remaining = self.cooldown - elapsed;
                return Err(QueueError::RateLimited {
                    retry_after_secs: remaining.as_secs().max(1),
                });
            }
        }
        cooldowns.insert((tenant_id, counter_id), Instant::now());
        Ok(())
    }

    async fn publish(&self, event: QueueEvent) {
        if let Err(error) = self.publisher.publish(event).await {
            tracing::error!(%error, "failed to publish queue notification");
        }
    }
}

fn internal(error: anyhow::Error) -> QueueError {
    tracing::error!(%error, "storage error");
    QueueError::Internal
}

fn tenant_timezone(tenant: &Tenant) -> Tz {
    match tenant.timezone.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            tracing::warn!(
                tenant = %tenant.slug,
                timezone = %tenant.timezone,
                "unknown tenant timezone, falling back to UTC"
            );
            chrono_tz::UTC
        }
    }
}

/// UTC bounds of the tenant-local calendar day containing `now`.
fn local_day_bounds(tz: &Tz, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = now.with_timezone(tz).date_naive().and_time(NaiveTime::MIN);
    let start = match tz.from_local_datetime(&midnight).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        // Local midnight can fall inside a DST gap; degrade to "now" so
        // numbering still only sees today's tickets.
        None => now,
    };
    (start, start + ChronoDuration::days(1))
}
