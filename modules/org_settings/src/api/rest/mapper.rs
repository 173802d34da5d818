//! Conversions between REST DTOs and contract models

use super::dto::SettingsResponse;
use crate::contract::SettingsView;

impl From<SettingsView> for SettingsResponse {
    fn from(view: SettingsView) -> Self {
        Self {
            settings: view.settings,
        }
    }
}
