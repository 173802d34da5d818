//! REST DTOs with serde derives for HTTP API

use crate::contract::SettingsMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Settings response DTO, returned by both GET and POST
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    /// Effective settings: defaults, overrides and `auth_google_apps_domains`
    #[schema(value_type = Object, example = json!({"date_format": "DD/MM/YY", "auth_google_apps_domains": []}))]
    pub settings: SettingsMap,
}

/// Settings update request: setting name to new value
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object, example = json!({"date_format": "YYYY-MM-DD", "auth_google_apps_domains": ["example.com"]}))]
pub struct UpdateSettingsRequest(pub SettingsMap);
