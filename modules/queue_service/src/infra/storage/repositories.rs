//! SeaORM repository implementations
//!
//! The atomic contracts (`insert_next`, `claim_next_waiting`,
//! `finish_last_called`) run inside a transaction with a `SELECT ... FOR
//! UPDATE` (`lock_exclusive`) on the row being contended, so concurrent
//! callers serialize at the database instead of in process memory.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    Counter, CounterPauseLog, CounterStatus, Seat, Tenant, Ticket, TicketStatus,
};
use crate::domain::repository::{
    CounterRepository, SeatRepository, TenantRepository, TicketRepository, TransitionOutcome,
};

use super::entity;

// ===== Tenant Repository =====

pub struct SeaOrmTenantRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTenantRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TenantRepository for SeaOrmTenantRepository {
    async fn find_by_id(&self, tenant_id: Uuid) -> Result<Option<Tenant>> {
        let model = entity::tenant::Entity::find_by_id(tenant_id)
            .one(&*self.db)
            .await?;
        Ok(match model {
            Some(m) => Some(m.try_into()?),
            None => None,
        })
    }
}

// ===== Counter Repository =====

pub struct SeaOrmCounterRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmCounterRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CounterRepository for SeaOrmCounterRepository {
    async fn find(&self, tenant_id: Uuid, counter_id: i64) -> Result<Option<Counter>> {
        let model = entity::counter::Entity::find_by_id(counter_id)
            .filter(entity::counter::Column::TenantId.eq(tenant_id))
            .one(&*self.db)
            .await?;
        Ok(model.map(|m| m.into()))
    }

    async fn list_active(&self) -> Result<Vec<Counter>> {
        let models = entity::counter::Entity::find()
            .filter(entity::counter::Column::Status.eq(entity::CounterStatus::Active))
            .order_by_asc(entity::counter::Column::TenantId)
            .order_by_asc(entity::counter::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn set_status(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        status: CounterStatus,
    ) -> Result<Option<Counter>> {
        let Some(model) = entity::counter::Entity::find_by_id(counter_id)
            .filter(entity::counter::Column::TenantId.eq(tenant_id))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::counter::ActiveModel = model.into();
        active.status = Set(status.into());
        let updated = active.update(&*self.db).await?;
        Ok(Some(updated.into()))
    }

    async fn append_pause_log(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        reason: &str,
    ) -> Result<CounterPauseLog> {
        let active = entity::counter_pause_log::ActiveModel {
            id: NotSet,
            tenant_id: Set(tenant_id),
            counter_id: Set(counter_id),
            reason: Set(reason.to_string()),
            created_at: Set(Utc::now()),
        };
        let model = entity::counter_pause_log::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;
        Ok(model.into())
    }
}

// ===== Seat Repository =====

pub struct SeaOrmSeatRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSeatRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SeatRepository for SeaOrmSeatRepository {
    async fn find_by_id(&self, seat_id: i64) -> Result<Option<Seat>> {
        let model = entity::seat::Entity::find_by_id(seat_id)
            .one(&*self.db)
            .await?;
        Ok(model.map(|m| m.into()))
    }

    async fn find_for_counter(&self, tenant_id: Uuid, counter_id: i64) -> Result<Vec<Seat>> {
        let models = entity::seat::Entity::find()
            .filter(entity::seat::Column::TenantId.eq(tenant_id))
            .filter(entity::seat::Column::CounterId.eq(counter_id))
            .order_by_asc(entity::seat::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn record_flip(
        &self,
        seat_id: i64,
        occupied: bool,
        last_empty_time: Option<DateTime<Utc>>,
        timestamp: DateTime<Utc>,
    ) -> Result<Seat> {
        let txn = self.db.begin().await?;

        // One transaction covers the occupancy write and the log
        // append: a failed append rolls the flip back with it.
        let model = entity::seat::Entity::find_by_id(seat_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow!("seat {seat_id} not found"))?;
        let tenant_id = model.tenant_id;
        let old_status = model.occupied;

        let mut active: entity::seat::ActiveModel = model.into();
        active.occupied = Set(occupied);
        active.last_empty_time = Set(last_empty_time);
        let updated = active.update(&txn).await?;

        let log = entity::seat_log::ActiveModel {
            id: NotSet,
            tenant_id: Set(tenant_id),
            seat_id: Set(seat_id),
            old_status: Set(old_status),
            new_status: Set(occupied),
            timestamp: Set(timestamp),
        };
        entity::seat_log::Entity::insert(log).exec(&txn).await?;

        txn.commit().await?;
        Ok(updated.into())
    }
}

// ===== Ticket Repository =====

pub struct SeaOrmTicketRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTicketRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TicketRepository for SeaOrmTicketRepository {
    async fn insert_next(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Ticket> {
        let txn = self.db.begin().await?;

        // Lock the counter row so concurrent issuances for the same
        // counter serialize around the max(number) read.
        let counter = entity::counter::Entity::find_by_id(counter_id)
            .filter(entity::counter::Column::TenantId.eq(tenant_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow!("counter {counter_id} vanished during issuance"))?;

        let max_number: Option<Option<i32>> = entity::ticket::Entity::find()
            .filter(entity::ticket::Column::TenantId.eq(tenant_id))
            .filter(entity::ticket::Column::CounterId.eq(counter.id))
            .filter(entity::ticket::Column::CreatedAt.gte(day_start))
            .filter(entity::ticket::Column::CreatedAt.lt(day_end))
            .select_only()
            .column_as(entity::ticket::Column::Number.max(), "max_number")
            .into_tuple()
            .one(&txn)
            .await?;
        let number = max_number.flatten().unwrap_or(0) + 1;

        let active = entity::ticket::ActiveModel {
            id: NotSet,
            tenant_id: Set(tenant_id),
            counter_id: Set(counter.id),
            number: Set(number),
            status: Set(entity::TicketStatus::Waiting),
            created_at: Set(now),
            called_at: Set(None),
            finished_at: Set(None),
            rating: Set(None),
            feedback: Set(None),
        };
        let model = entity::ticket::Entity::insert(active)
            .exec_with_returning(&txn)
            .await?;

        txn.commit().await?;
        Ok(model.into())
    }

    async fn claim_next_waiting(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Ticket>> {
        let txn = self.db.begin().await?;

        let candidate = entity::ticket::Entity::find()
            .filter(entity::ticket::Column::TenantId.eq(tenant_id))
            .filter(entity::ticket::Column::CounterId.eq(counter_id))
            .filter(entity::ticket::Column::Status.eq(entity::TicketStatus::Waiting))
            .order_by_asc(entity::ticket::Column::CreatedAt)
            .order_by_asc(entity::ticket::Column::Id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        let Some(model) = candidate else {
            txn.commit().await?;
            return Ok(None);
        };

        let mut active: entity::ticket::ActiveModel = model.into();
        active.status = Set(entity::TicketStatus::Called);
        active.called_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(updated.into()))
    }

    async fn finish_last_called(
        &self,
        tenant_id: Uuid,
        counter_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Ticket>> {
        let txn = self.db.begin().await?;

        let candidate = entity::ticket::Entity::find()
            .filter(entity::ticket::Column::TenantId.eq(tenant_id))
            .filter(entity::ticket::Column::CounterId.eq(counter_id))
            .filter(entity::ticket::Column::Status.eq(entity::TicketStatus::Called))
            .order_by_desc(entity::ticket::Column::CalledAt)
            .order_by_desc(entity::ticket::Column::Id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        let Some(model) = candidate else {
            txn.commit().await?;
            return Ok(None);
        };

        let mut active: entity::ticket::ActiveModel = model.into();
        active.status = Set(entity::TicketStatus::Done);
        active.finished_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(updated.into()))
    }

    async fn transition(
        &self,
        tenant_id: Uuid,
        ticket_id: i64,
        to: TicketStatus,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome> {
        let txn = self.db.begin().await?;

        // Lock the row so the validation runs against the committed
        // status, not a stale read.
        let Some(model) = entity::ticket::Entity::find_by_id(ticket_id)
            .filter(entity::ticket::Column::TenantId.eq(tenant_id))
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            txn.commit().await?;
            return Ok(TransitionOutcome::NotFound);
        };

        let from: TicketStatus = model.status.into();
        if !from.can_transition_to(to) {
            txn.commit().await?;
            return Ok(TransitionOutcome::Rejected { from });
        }

        let stamp_called = to == TicketStatus::Called && model.called_at.is_none();
        let stamp_finished = to == TicketStatus::Done && model.finished_at.is_none();
        let mut active: entity::ticket::ActiveModel = model.into();
        active.status = Set(to.into());
        if stamp_called {
            active.called_at = Set(Some(now));
        }
        if stamp_finished {
            active.finished_at = Set(Some(now));
        }
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(TransitionOutcome::Applied(updated.into()))
    }

    async fn list_waiting(&self, tenant_id: Uuid, counter_id: i64) -> Result<Vec<Ticket>> {
        let models = entity::ticket::Entity::find()
            .filter(entity::ticket::Column::TenantId.eq(tenant_id))
            .filter(entity::ticket::Column::CounterId.eq(counter_id))
            .filter(entity::ticket::Column::Status.eq(entity::TicketStatus::Waiting))
            .order_by_asc(entity::ticket::Column::CreatedAt)
            .order_by_asc(entity::ticket::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}
