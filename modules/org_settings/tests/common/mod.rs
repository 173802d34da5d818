//! Common test utilities: in-memory repository, recording sinks and service
//! builders

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use org_settings::contract::{ChangeRecord, Organization, SettingsMap};
use org_settings::domain::{
    AuditEntry, AuditSink, ChangeEvent, DefaultsRegistry, EventRecorder, OrganizationEdit,
    OrganizationRepository, Service,
};
use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &str) {
    println!("\n🧪 TEST: {}", test_name);
    println!("📋 PURPOSE: {}", purpose);
}

/// JSON object literal to settings map
pub fn map(value: Value) -> SettingsMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// `{"a": 1, "b": null}`
pub fn scenario_defaults() -> DefaultsRegistry {
    [("a", json!(1)), ("b", Value::Null)].into_iter().collect()
}

#[derive(Clone, Default)]
pub struct MockOrganizationRepo {
    data: Arc<RwLock<HashMap<Uuid, Organization>>>,
    fail_commits: Arc<AtomicBool>,
}

impl MockOrganizationRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, org: Organization) {
        self.data.write().insert(org.id, org);
    }

    pub fn get(&self, id: Uuid) -> Option<Organization> {
        self.data.read().get(&id).cloned()
    }

    /// Make every following `modify` fail at commit time
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrganizationRepository for MockOrganizationRepo {
    async fn create(&self, org: &Organization) -> anyhow::Result<Organization> {
        self.data.write().insert(org.id, org.clone());
        Ok(org.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Organization>> {
        Ok(self.data.read().get(&id).cloned())
    }

    async fn modify(
        &self,
        id: Uuid,
        edit: &OrganizationEdit<'_>,
    ) -> anyhow::Result<Option<(Organization, ChangeRecord)>> {
        // The write lock plays the role of the transaction
        let mut data = self.data.write();
        let Some(current) = data.get(&id) else {
            return Ok(None);
        };

        let mut org = current.clone();
        let change = edit(&mut org)?;
        if self.fail_commits.load(Ordering::SeqCst) {
            anyhow::bail!("simulated commit failure");
        }

        org.updated_at = Utc::now();
        data.insert(id, org.clone());
        Ok(Some((org, change)))
    }
}

#[derive(Clone, Default)]
pub struct RecordingAuditSink {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl RecordingAuditSink {
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Remembers which thread each entry was written from
#[derive(Clone, Default)]
pub struct ThreadRecordingAuditSink {
    threads: Arc<Mutex<Vec<std::thread::ThreadId>>>,
}

impl ThreadRecordingAuditSink {
    pub fn threads(&self) -> Vec<std::thread::ThreadId> {
        self.threads.lock().clone()
    }
}

impl AuditSink for ThreadRecordingAuditSink {
    fn record(&self, _entry: &AuditEntry) -> anyhow::Result<()> {
        self.threads.lock().push(std::thread::current().id());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct FailingAuditSink;

impl AuditSink for FailingAuditSink {
    fn record(&self, _entry: &AuditEntry) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }

    fn flush(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingEventRecorder {
    events: Arc<Mutex<Vec<ChangeEvent>>>,
}

impl RecordingEventRecorder {
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventRecorder for RecordingEventRecorder {
    async fn record(&self, event: &ChangeEvent) -> anyhow::Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Service over in-memory collaborators, with handles to inspect them
pub struct TestHarness {
    pub service: Arc<Service>,
    pub repo: MockOrganizationRepo,
    pub audit: RecordingAuditSink,
    pub events: RecordingEventRecorder,
    pub org_id: Uuid,
    pub admin_id: Uuid,
}

impl TestHarness {
    pub fn new(defaults: DefaultsRegistry) -> Self {
        Self::with(defaults, |service| service)
    }

    pub fn with(defaults: DefaultsRegistry, configure: impl FnOnce(Service) -> Service) -> Self {
        let repo = MockOrganizationRepo::new();
        let audit = RecordingAuditSink::default();
        let events = RecordingEventRecorder::default();

        let org = Organization::new(Uuid::new_v4(), "Acme Corp", "acme");
        let org_id = org.id;
        repo.insert(org);

        let service = Service::new(
            Arc::new(repo.clone()),
            Arc::new(defaults),
            Arc::new(audit.clone()),
            Arc::new(events.clone()),
        );

        Self {
            service: Arc::new(configure(service)),
            repo,
            audit,
            events,
            org_id,
            admin_id: Uuid::new_v4(),
        }
    }

    pub fn admin(&self) -> org_settings::AuthContext {
        org_settings::AuthContext::admin(self.admin_id, self.org_id)
    }

    pub fn member(&self) -> org_settings::AuthContext {
        org_settings::AuthContext::member(Uuid::new_v4(), self.org_id)
    }

    pub fn org(&self) -> Organization {
        self.repo
            .get(self.org_id)
            .unwrap_or_else(|| panic!("organization {} missing", self.org_id))
    }
}
