//! Module wiring and lifecycle
//!
//! Builds the repository stack, the domain service and the reset
//! registry, and exposes the pieces the host binary needs: migrations,
//! the REST router and the cancellable auto-call loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio_util::sync::CancellationToken;

use crate::api::rest::routes;
use crate::config::Config;
use crate::domain::{
    AutoCallScheduler, NoOpPublisher, NotificationPublisher, ResetRegistry, Service,
};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::repositories::{
    SeaOrmCounterRepository, SeaOrmSeatRepository, SeaOrmTenantRepository,
    SeaOrmTicketRepository,
};

pub struct QueueServiceModule {
    config: Config,
    service: Arc<Service>,
    resets: Arc<ResetRegistry>,
}

impl QueueServiceModule {
    /// Wire the module against a database with no outbound notifications.
    pub fn init(db: Arc<DatabaseConnection>, config: Config) -> Self {
        Self::init_with_publisher(db, config, Arc::new(NoOpPublisher))
    }

    pub fn init_with_publisher(
        db: Arc<DatabaseConnection>,
        config: Config,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        let resets = Arc::new(ResetRegistry::new());
        let service = Arc::new(Service::new(
            Arc::new(SeaOrmTenantRepository::new(db.clone())),
            Arc::new(SeaOrmCounterRepository::new(db.clone())),
            Arc::new(SeaOrmSeatRepository::new(db.clone())),
            Arc::new(SeaOrmTicketRepository::new(db)),
            publisher,
            resets.clone(),
            &config,
        ));
        Self {
            config,
            service,
            resets,
        }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None).await?;
        tracing::info!("queue service migrations completed");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// REST router with the service injected.
    pub fn router(&self) -> axum::Router {
        routes::router(self.service.clone())
    }

    pub fn scheduler(&self) -> AutoCallScheduler {
        AutoCallScheduler::new(
            self.service.clone(),
            self.resets.clone(),
            Duration::from_secs(self.config.auto_call_interval_secs),
        )
    }

    /// Run the auto-call loop until the token is cancelled.
    pub async fn serve(&self, cancel: CancellationToken) -> Result<()> {
        self.scheduler().run(cancel).await;
        Ok(())
    }
}
