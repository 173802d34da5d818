//! Domain layer - business logic and services

pub mod audit;
pub mod defaults;
pub mod descriptor;
pub mod events;
pub mod merge;
pub mod repository;
pub mod service;

pub use audit::{AuditEntry, AuditSink, NoOpAuditSink};
pub use defaults::DefaultsRegistry;
pub use descriptor::{GenericSetting, GoogleAppsDomainsSetting, SettingDescriptor, SettingsCatalog};
pub use events::{ChangeEvent, EventRecorder, NoOpEventRecorder, TracingEventRecorder};
pub use merge::merge_with_defaults;
pub use repository::{OrganizationEdit, OrganizationRepository};
pub use service::Service;
