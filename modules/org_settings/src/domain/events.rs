//! Change events for the application's audit/event feed
//!
//! One event is recorded per successful settings update. Recorders are
//! pluggable: the database recorder lives in `infra::storage`, the ones here
//! need no storage.

use crate::contract::{ChangeRecord, SettingsMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Action recorded for settings updates
pub const EDIT_ACTION: &str = "edit";

/// Object type recorded for settings updates
pub const SETTINGS_OBJECT_TYPE: &str = "settings";

/// Structured change event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// What happened (`edit`)
    pub action: String,
    /// Affected object ID (the organization)
    pub object_id: String,
    /// Affected object type (`settings`)
    pub object_type: String,
    /// Submitted values
    pub new_values: SettingsMap,
    /// Values before the update
    pub previous_values: SettingsMap,
    /// Organization the change belongs to
    pub org_id: Uuid,
    /// Acting user
    pub user_id: Uuid,
    /// Timestamp of the event
    pub created_at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Create the event for a committed settings update
    pub fn settings_edited(org_id: Uuid, user_id: Uuid, change: ChangeRecord) -> Self {
        Self {
            action: EDIT_ACTION.to_string(),
            object_id: org_id.to_string(),
            object_type: SETTINGS_OBJECT_TYPE.to_string(),
            new_values: change.new_values,
            previous_values: change.previous_values,
            org_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Sink for change events
#[async_trait::async_trait]
pub trait EventRecorder: Send + Sync {
    async fn record(&self, event: &ChangeEvent) -> anyhow::Result<()>;
}

/// Recorder that drops every event
pub struct NoOpEventRecorder;

#[async_trait::async_trait]
impl EventRecorder for NoOpEventRecorder {
    async fn record(&self, _event: &ChangeEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Recorder that emits each event as a structured log record
pub struct TracingEventRecorder;

#[async_trait::async_trait]
impl EventRecorder for TracingEventRecorder {
    async fn record(&self, event: &ChangeEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(event)?;
        tracing::info!(
            target: "org_settings::events",
            action = %event.action,
            object_type = %event.object_type,
            object_id = %event.object_id,
            event = %payload,
            "change event recorded"
        );
        Ok(())
    }
}
