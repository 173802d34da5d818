//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{AuthContext, OrgSettingsApi, SettingsError, SettingsMap, SettingsView};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client implementation that directly calls the domain service
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl OrgSettingsApi for NativeClient {
    async fn get_settings(&self, ctx: &AuthContext) -> Result<SettingsView, SettingsError> {
        self.service.get_settings(ctx).await
    }

    async fn update_settings(
        &self,
        ctx: &AuthContext,
        patch: SettingsMap,
    ) -> Result<SettingsView, SettingsError> {
        self.service.update_settings(ctx, patch).await
    }
}
