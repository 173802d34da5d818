//! Native client trait for inter-module communication
//!
//! Other modules read and update organization settings through this trait
//! without going over HTTP.

use super::{
    error::SettingsError,
    model::{AuthContext, SettingsMap, SettingsView},
};
use async_trait::async_trait;

/// Organization settings API for inter-module communication
#[async_trait]
pub trait OrgSettingsApi: Send + Sync {
    /// Effective settings of the caller's organization
    async fn get_settings(&self, ctx: &AuthContext) -> Result<SettingsView, SettingsError>;

    /// Apply `patch` to the caller's organization and return the new view
    async fn update_settings(
        &self,
        ctx: &AuthContext,
        patch: SettingsMap,
    ) -> Result<SettingsView, SettingsError>;
}
