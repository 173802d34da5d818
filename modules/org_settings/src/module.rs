//! Module declaration and lifecycle: wiring of config, storage, sinks,
//! service and routes

use crate::api::rest::auth::{CredentialResolver, StaticApiKeys};
use crate::config::{Config, EventSinkKind};
use crate::contract::{OrgSettingsApi, Organization};
use crate::domain::{
    AuditSink, DefaultsRegistry, EventRecorder, NoOpEventRecorder, OrganizationRepository,
    Service, TracingEventRecorder,
};
use crate::infra::audit::FileAuditSink;
use crate::infra::storage::repositories::{SeaOrmEventRecorder, SeaOrmOrganizationRepository};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Organization settings module
pub struct OrgSettingsModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
    org_repo: RwLock<Option<Arc<dyn OrganizationRepository>>>,
    audit_sink: RwLock<Option<Arc<dyn AuditSink>>>,
}

impl Default for OrgSettingsModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            service: RwLock::new(None),
            org_repo: RwLock::new(None),
            audit_sink: RwLock::new(None),
        }
    }
}

impl OrgSettingsModule {
    /// Build repositories, sinks and the domain service
    pub async fn init(&self, cfg: Config, db: Arc<DatabaseConnection>) -> Result<()> {
        let defaults = Arc::new(defaults_registry(&cfg));

        let org_repo: Arc<dyn OrganizationRepository> =
            Arc::new(SeaOrmOrganizationRepository::new(db.clone()));

        let audit_sink: Arc<dyn AuditSink> =
            Arc::new(FileAuditSink::open(&cfg.audit).context("opening audit log")?);

        let event_recorder: Arc<dyn EventRecorder> = match cfg.events {
            EventSinkKind::Database => Arc::new(SeaOrmEventRecorder::new(db)),
            EventSinkKind::Log => Arc::new(TracingEventRecorder),
            EventSinkKind::None => Arc::new(NoOpEventRecorder),
        };

        let service = Service::new(
            org_repo.clone(),
            defaults.clone(),
            audit_sink.clone(),
            event_recorder,
        )
        .with_strict_keys(cfg.strict_keys);

        *self.service.write() = Some(Arc::new(service));
        *self.org_repo.write() = Some(org_repo);
        *self.audit_sink.write() = Some(audit_sink);

        tracing::info!(
            defaults = defaults.len(),
            events = ?cfg.events,
            strict_keys = cfg.strict_keys,
            "Organization settings service initialized"
        );
        *self.config.write() = cfg;
        Ok(())
    }

    /// Run database migrations
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Organization settings migrations completed");
        Ok(())
    }

    /// Register REST routes, authenticated with the configured API keys
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let keys = StaticApiKeys::new(&self.config.read().api_keys);
        if keys.is_empty() {
            tracing::warn!("No API keys configured; every settings request will be rejected");
        }
        self.register_rest_with(router, Arc::new(keys))
    }

    /// Register REST routes with a host-provided credential resolver
    pub fn register_rest_with(
        &self,
        router: axum::Router,
        resolver: Arc<dyn CredentialResolver>,
    ) -> Result<axum::Router> {
        let service = self.service()?;

        tracing::info!("Registering organization settings REST routes");
        crate::api::rest::routes::register_routes(router, service, resolver)
    }

    /// In-process client
    pub fn client(&self) -> Result<Arc<dyn OrgSettingsApi>> {
        let service = self.service()?;
        Ok(Arc::new(crate::api::native::NativeClient::new(service)))
    }

    pub fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// Create `org` unless an organization with its ID already exists.
    /// Returns whether it was created.
    pub async fn provision(&self, org: &Organization) -> Result<bool> {
        let repo = self
            .org_repo
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;

        if repo.find_by_id(org.id).await?.is_some() {
            return Ok(false);
        }
        repo.create(org).await?;
        tracing::info!(org_id = %org.id, slug = %org.slug, "Organization provisioned");
        Ok(true)
    }

    /// Flush the audit log
    pub fn shutdown(&self) -> Result<()> {
        if let Some(sink) = self.audit_sink.read().as_ref() {
            sink.flush()?;
        }
        tracing::info!("Organization settings module stopped");
        Ok(())
    }
}

fn defaults_registry(cfg: &Config) -> DefaultsRegistry {
    let base = if cfg.include_builtin_defaults {
        DefaultsRegistry::builtin()
    } else {
        DefaultsRegistry::new()
    };
    base.with_overrides(cfg.defaults.clone())
}
