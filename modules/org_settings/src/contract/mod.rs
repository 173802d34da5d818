//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.

pub mod client;
pub mod error;
pub mod model;

pub use client::OrgSettingsApi;
pub use error::SettingsError;
pub use model::{
    AuthContext, ChangeRecord, Organization, SettingsMap, SettingsView, GOOGLE_APPS_DOMAINS_KEY,
    SETTINGS_ATTRIBUTE,
};
