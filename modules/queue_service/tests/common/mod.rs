//! Shared fixtures and in-memory mock repositories for queue tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use queue_service::config::Config;
use queue_service::contract::*;
use queue_service::domain::repository::{
    CounterRepository, SeatRepository, TenantRepository, TicketRepository, TransitionOutcome,
};
use queue_service::domain::{NotificationPublisher, QueueEvent, ResetRegistry, Service};

pub const OFFICER_SEAT: i64 = 1;
pub const CLIENT_SEAT: i64 = 2;

// ===== Mock repositories =====

#[derive(Clone)]
pub struct MockTenantRepo {
    data: Arc<RwLock<HashMap<Uuid, Tenant>>>,
}

impl MockTenantRepo {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn add(&self, tenant: Tenant) {
        self.data.write().insert(tenant.id, tenant);
    }
}

#[async_trait]
impl TenantRepository for MockTenantRepo {
    async fn find_by_id(&self, tenant_id: Uuid) -> anyhow::Result<Option<Tenant>> {
        Ok(self.data.read().get(&tenant_id).cloned())
    }
}

#[derive(Clone)]
pub struct MockCounterRepo {
    data: Arc<RwLock<HashMap<(Uuid, i64), Counter>>>,
    pause_logs: Arc<RwLock<Vec<CounterPauseLog>>>,
}

impl MockCounterRepo {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            pause_logs: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn add(&self, counter: Counter) {
        self.data
            .write()
            .insert((counter.tenant_id, counter.id), counter);
    }

    pub fn get(&self, tenant_id: Uuid, counter_id: i64) -> Option<Counter> {
        self.data.read().get(&(tenant_id, counter_id)).cloned()
    }

    pub fn pause_logs(&self) -> Vec<CounterPauseLog> {
        self.pause_logs.read().clone()
    }
}

#[async_trait]
impl CounterRepository for MockCounterRepo {
    async fn find(&self, tenant_id: Uuid, counter_id: i64) -> anyhow::Result<Option<Counter>> {
        Ok(self.data.read().get(&(tenant_id, counter_id)).cloned())
    }

    async fn list_active(&self) -> anyhow::Result<Vec<Counter>> {
        let mut counters: Vec<Counter> = self
            .data
            .read()
            .values()
            .filter(|c| c.is_active())
            .cloned()
            .collect();
        counters.sort_by_key(|c| c.id);
        Ok(counters)
    }

    async fn set_status(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        status: CounterStatus,
    ) -> anyhow::Result<Option<Counter>> {
        let mut data = self.data.write();
        Ok(data.get_mut(&(tenant_id, counter_id)).map(|counter| {
            counter.status = status;
            counter.clone()
        }))
    }

    async fn append_pause_log(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        reason: &str,
    ) -> anyhow::Result<CounterPauseLog> {
        let mut logs = self.pause_logs.write();
        let log = CounterPauseLog {
            id: logs.len() as i64 + 1,
            tenant_id,
            counter_id,
            reason: reason.to_string(),
            created_at: Utc::now(),
        };
        logs.push(log.clone());
        Ok(log)
    }
}

#[derive(Clone)]
pub struct MockSeatRepo {
    data: Arc<RwLock<HashMap<i64, Seat>>>,
    logs: Arc<RwLock<Vec<SeatLog>>>,
    fail_flips: Arc<RwLock<HashSet<i64>>>,
}

impl MockSeatRepo {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            logs: Arc::new(RwLock::new(Vec::new())),
            fail_flips: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Make every occupancy flip for one seat fail.
    pub fn fail_flip(&self, seat_id: i64) {
        self.fail_flips.write().insert(seat_id);
    }

    pub fn add(&self, seat: Seat) {
        self.data.write().insert(seat.id, seat);
    }

    /// Directly set occupancy, bypassing the service (no log, no reset).
    pub fn place(&self, seat_id: i64, occupied: bool) {
        if let Some(seat) = self.data.write().get_mut(&seat_id) {
            seat.occupied = occupied;
        }
    }

    pub fn get(&self, seat_id: i64) -> Option<Seat> {
        self.data.read().get(&seat_id).cloned()
    }

    pub fn logs(&self) -> Vec<SeatLog> {
        self.logs.read().clone()
    }
}

#[async_trait]
impl SeatRepository for MockSeatRepo {
    async fn find_by_id(&self, seat_id: i64) -> anyhow::Result<Option<Seat>> {
        Ok(self.data.read().get(&seat_id).cloned())
    }

    async fn find_for_counter(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> anyhow::Result<Vec<Seat>> {
        let mut seats: Vec<Seat> = self
            .data
            .read()
            .values()
            .filter(|s| s.tenant_id == tenant_id && s.counter_id == counter_id)
            .cloned()
            .collect();
        seats.sort_by_key(|s| s.id);
        Ok(seats)
    }

    async fn record_flip(
        &self,
        seat_id: i64,
        occupied: bool,
        last_empty_time: Option<DateTime<Utc>>,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Seat> {
        if self.fail_flips.read().contains(&seat_id) {
            anyhow::bail!("injected failure for seat {seat_id}");
        }
        // One write lock spans the occupancy write and the log append,
        // matching the transactional SQL implementation.
        let mut data = self.data.write();
        let seat = data
            .get_mut(&seat_id)
            .ok_or_else(|| anyhow::anyhow!("seat {seat_id} not found"))?;
        let old_status = seat.occupied;
        seat.occupied = occupied;
        seat.last_empty_time = last_empty_time;
        let mut logs = self.logs.write();
        let next_log_id = logs.len() as i64 + 1;
        logs.push(SeatLog {
            id: next_log_id,
            tenant_id: seat.tenant_id,
            seat_id,
            old_status,
            new_status: occupied,
            timestamp,
        });
        Ok(seat.clone())
    }
}

#[derive(Clone)]
pub struct MockTicketRepo {
    data: Arc<RwLock<Vec<Ticket>>>,
    next_id: Arc<AtomicI64>,
    fail_counters: Arc<RwLock<HashSet<i64>>>,
}

impl MockTicketRepo {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            fail_counters: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Make every ticket operation for one counter fail.
    pub fn fail_counter(&self, counter_id: i64) {
        self.fail_counters.write().insert(counter_id);
    }

    pub fn seed(&self, ticket: Ticket) -> Ticket {
        let mut ticket = ticket;
        ticket.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.data.write().push(ticket.clone());
        ticket
    }

    pub fn get(&self, ticket_id: i64) -> Option<Ticket> {
        self.data.read().iter().find(|t| t.id == ticket_id).cloned()
    }

    pub fn all(&self) -> Vec<Ticket> {
        self.data.read().clone()
    }

    fn check_poison(&self, counter_id: i64) -> anyhow::Result<()> {
        if self.fail_counters.read().contains(&counter_id) {
            anyhow::bail!("injected failure for counter {counter_id}");
        }
        Ok(())
    }
}

#[async_trait]
impl TicketRepository for MockTicketRepo {
    async fn insert_next(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Ticket> {
        self.check_poison(counter_id)?;
        // Single write lock covers the numbering read and the insert,
        // matching the row-lock atomicity of the SQL implementation.
        let mut data = self.data.write();
        let number = data
            .iter()
            .filter(|t| {
                t.tenant_id == tenant_id
                    && t.counter_id == counter_id
                    && t.created_at >= day_start
                    && t.created_at < day_end
            })
            .map(|t| t.number)
            .max()
            .unwrap_or(0)
            + 1;
        let ticket = Ticket {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            tenant_id,
            counter_id,
            number,
            status: TicketStatus::Waiting,
            created_at: now,
            called_at: None,
            finished_at: None,
            rating: None,
            feedback: None,
        };
        data.push(ticket.clone());
        Ok(ticket)
    }

    async fn claim_next_waiting(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Ticket>> {
        self.check_poison(counter_id)?;
        let mut data = self.data.write();
        let oldest = data
            .iter_mut()
            .filter(|t| {
                t.tenant_id == tenant_id
                    && t.counter_id == counter_id
                    && t.status == TicketStatus::Waiting
            })
            .min_by_key(|t| (t.created_at, t.id));
        Ok(oldest.map(|ticket| {
            ticket.status = TicketStatus::Called;
            ticket.called_at = Some(now);
            ticket.clone()
        }))
    }

    async fn finish_last_called(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Ticket>> {
        self.check_poison(counter_id)?;
        let mut data = self.data.write();
        let latest = data
            .iter_mut()
            .filter(|t| {
                t.tenant_id == tenant_id
                    && t.counter_id == counter_id
                    && t.status == TicketStatus::Called
            })
            .max_by_key(|t| (t.called_at, t.id));
        Ok(latest.map(|ticket| {
            ticket.status = TicketStatus::Done;
            ticket.finished_at = Some(now);
            ticket.clone()
        }))
    }

    async fn transition(
        &self,
        tenant_id: Uuid,
        ticket_id: i64,
        to: TicketStatus,
        now: DateTime<Utc>,
    ) -> anyhow::Result<TransitionOutcome> {
        // Validation and write happen under one write lock, like the
        // row-locked SQL implementation.
        let mut data = self.data.write();
        let Some(ticket) = data
            .iter_mut()
            .find(|t| t.tenant_id == tenant_id && t.id == ticket_id)
        else {
            return Ok(TransitionOutcome::NotFound);
        };
        if !ticket.status.can_transition_to(to) {
            return Ok(TransitionOutcome::Rejected {
                from: ticket.status,
            });
        }
        ticket.status = to;
        match to {
            TicketStatus::Called if ticket.called_at.is_none() => ticket.called_at = Some(now),
            TicketStatus::Done if ticket.finished_at.is_none() => ticket.finished_at = Some(now),
            _ => {}
        }
        Ok(TransitionOutcome::Applied(ticket.clone()))
    }

    async fn list_waiting(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
    ) -> anyhow::Result<Vec<Ticket>> {
        let mut waiting: Vec<Ticket> = self
            .data
            .read()
            .iter()
            .filter(|t| {
                t.tenant_id == tenant_id
                    && t.counter_id == counter_id
                    && t.status == TicketStatus::Waiting
            })
            .cloned()
            .collect();
        waiting.sort_by_key(|t| (t.created_at, t.id));
        Ok(waiting)
    }
}

// ===== Recording publisher =====

pub struct RecordingPublisher {
    events: Mutex<Vec<QueueEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<QueueEvent> {
        self.events.lock().clone()
    }

    pub fn last(&self) -> Option<QueueEvent> {
        self.events.lock().last().cloned()
    }
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(&self, event: QueueEvent) -> anyhow::Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

// ===== Fixture =====

/// One tenant with one counter (id 1) and its officer/client seats,
/// both initially empty. Cooldown defaults to disabled so tests can
/// issue tickets freely.
pub struct QueueFixture {
    pub service: Arc<Service>,
    pub tenants: MockTenantRepo,
    pub counters: MockCounterRepo,
    pub seats: MockSeatRepo,
    pub tickets: MockTicketRepo,
    pub publisher: Arc<RecordingPublisher>,
    pub resets: Arc<ResetRegistry>,
    pub tenant_id: Uuid,
    pub counter_id: i64,
}

impl QueueFixture {
    pub fn new() -> Self {
        Self::with_config(Config {
            issue_cooldown_secs: 0,
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        let tenant_id = Uuid::new_v4();
        let tenants = MockTenantRepo::new();
        tenants.add(Tenant {
            id: tenant_id,
            slug: "binh-minh".to_string(),
            name: "Bình Minh ward office".to_string(),
            timezone: "Asia/Ho_Chi_Minh".to_string(),
            allowed_time_ranges: Vec::new(),
        });

        let counters = MockCounterRepo::new();
        counters.add(Counter {
            id: 1,
            tenant_id,
            name: "Counter 1".to_string(),
            status: CounterStatus::Active,
        });

        let seats = MockSeatRepo::new();
        seats.add(Seat {
            id: OFFICER_SEAT,
            tenant_id,
            counter_id: 1,
            name: "Officer seat 1".to_string(),
            kind: SeatKind::Officer,
            occupied: false,
            last_empty_time: None,
        });
        seats.add(Seat {
            id: CLIENT_SEAT,
            tenant_id,
            counter_id: 1,
            name: "Client seat 1".to_string(),
            kind: SeatKind::Client,
            occupied: false,
            last_empty_time: None,
        });

        let tickets = MockTicketRepo::new();
        let publisher = Arc::new(RecordingPublisher::new());
        let resets = Arc::new(ResetRegistry::new());

        let service = Arc::new(Service::new(
            Arc::new(tenants.clone()),
            Arc::new(counters.clone()),
            Arc::new(seats.clone()),
            Arc::new(tickets.clone()),
            publisher.clone(),
            resets.clone(),
            &config,
        ));

        Self {
            service,
            tenants,
            counters,
            seats,
            tickets,
            publisher,
            resets,
            tenant_id,
            counter_id: 1,
        }
    }

    /// Replace the fixture tenant with one carrying issuance windows.
    pub fn set_time_ranges(&self, ranges: Vec<TimeRange>) {
        self.tenants.add(Tenant {
            id: self.tenant_id,
            slug: "binh-minh".to_string(),
            name: "Bình Minh ward office".to_string(),
            timezone: "Asia/Ho_Chi_Minh".to_string(),
            allowed_time_ranges: ranges,
        });
    }

    pub fn officer_present(&self, present: bool) {
        self.seats.place(OFFICER_SEAT, present);
    }

    pub fn client_present(&self, present: bool) {
        self.seats.place(CLIENT_SEAT, present);
    }

    /// Add another auto-call-eligible counter (officer seated, client
    /// seat empty) with seat ids derived from the counter id.
    pub fn add_counter(&self, counter_id: i64) {
        self.counters.add(Counter {
            id: counter_id,
            tenant_id: self.tenant_id,
            name: format!("Counter {counter_id}"),
            status: CounterStatus::Active,
        });
        self.seats.add(Seat {
            id: counter_id * 10 + 1,
            tenant_id: self.tenant_id,
            counter_id,
            name: format!("Officer seat {counter_id}"),
            kind: SeatKind::Officer,
            occupied: true,
            last_empty_time: None,
        });
        self.seats.add(Seat {
            id: counter_id * 10 + 2,
            tenant_id: self.tenant_id,
            counter_id,
            name: format!("Client seat {counter_id}"),
            kind: SeatKind::Client,
            occupied: false,
            last_empty_time: None,
        });
    }

    pub fn seed_waiting(&self, counter_id: i64, number: i32, created_at: DateTime<Utc>) -> Ticket {
        self.tickets.seed(Ticket {
            id: 0,
            tenant_id: self.tenant_id,
            counter_id,
            number,
            status: TicketStatus::Waiting,
            created_at,
            called_at: None,
            finished_at: None,
            rating: None,
            feedback: None,
        })
    }

    pub fn seed_called(&self, counter_id: i64, number: i32, called_at: DateTime<Utc>) -> Ticket {
        self.tickets.seed(Ticket {
            id: 0,
            tenant_id: self.tenant_id,
            counter_id,
            number,
            status: TicketStatus::Called,
            created_at: called_at - chrono::Duration::minutes(10),
            called_at: Some(called_at),
            finished_at: None,
            rating: None,
            feedback: None,
        })
    }

    /// Consume and report the counter's reset signal state.
    pub async fn reset_raised(&self) -> bool {
        self.resets
            .signal(self.tenant_id, self.counter_id)
            .wait_with_timeout(std::time::Duration::from_millis(10))
            .await
    }
}
