//! Organization Settings Module
//!
//! Reads and updates an organization's configuration settings and keeps an
//! audit trail of who changed what. Stored overrides are merged with a
//! process-wide defaults registry; every committed update writes an audit
//! log line and records a change event.

// Public exports
pub mod contract;
pub use contract::{
    client::OrgSettingsApi, error::SettingsError, AuthContext, ChangeRecord, Organization,
    SettingsMap, SettingsView, GOOGLE_APPS_DOMAINS_KEY,
};

pub mod module;
pub use module::OrgSettingsModule;

pub mod config;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
