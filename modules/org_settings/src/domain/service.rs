//! Domain service - business logic orchestration

use super::audit::{AuditEntry, AuditSink};
use super::defaults::DefaultsRegistry;
use super::descriptor::SettingsCatalog;
use super::events::{ChangeEvent, EventRecorder};
use super::merge::{effective_value, merge_with_defaults};
use super::repository::OrganizationRepository;
use crate::contract::{
    AuthContext, ChangeRecord, Organization, SettingsError, SettingsMap, SettingsView,
};
use std::sync::Arc;

/// Domain service for organization settings
pub struct Service {
    org_repo: Arc<dyn OrganizationRepository>,
    defaults: Arc<DefaultsRegistry>,
    catalog: SettingsCatalog,
    audit_sink: Arc<dyn AuditSink>,
    event_recorder: Arc<dyn EventRecorder>,
    /// Reject keys unknown to both the defaults registry and the catalog
    strict_keys: bool,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        org_repo: Arc<dyn OrganizationRepository>,
        defaults: Arc<DefaultsRegistry>,
        audit_sink: Arc<dyn AuditSink>,
        event_recorder: Arc<dyn EventRecorder>,
    ) -> Self {
        Self {
            org_repo,
            defaults,
            catalog: SettingsCatalog::default(),
            audit_sink,
            event_recorder,
            strict_keys: true,
        }
    }

    /// Replace the setting catalog
    pub fn with_catalog(mut self, catalog: SettingsCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Enable or disable rejection of unknown setting keys
    pub fn with_strict_keys(mut self, strict_keys: bool) -> Self {
        self.strict_keys = strict_keys;
        self
    }

    /// Effective settings of the caller's organization
    pub async fn get_settings(&self, ctx: &AuthContext) -> Result<SettingsView, SettingsError> {
        ensure_admin(ctx)?;

        let org = self
            .org_repo
            .find_by_id(ctx.org_id)
            .await
            .map_err(repository_error)?
            .ok_or_else(|| SettingsError::organization_not_found(ctx.org_id))?;

        Ok(self.view(&org))
    }

    /// Apply `patch` to the caller's organization.
    ///
    /// The audit line and the change event are only produced once the
    /// update is committed.
    pub async fn update_settings(
        &self,
        ctx: &AuthContext,
        patch: SettingsMap,
    ) -> Result<SettingsView, SettingsError> {
        ensure_admin(ctx)?;
        self.check_known_keys(&patch)?;

        let catalog = &self.catalog;
        let defaults: &DefaultsRegistry = &self.defaults;
        let edit = |org: &mut Organization| -> anyhow::Result<ChangeRecord> {
            Ok(apply_patch(catalog, defaults, org, &patch)?)
        };

        let (org, change) = self
            .org_repo
            .modify(ctx.org_id, &edit)
            .await
            .map_err(repository_error)?
            .ok_or_else(|| SettingsError::organization_not_found(ctx.org_id))?;

        tracing::debug!(
            org_id = %org.id,
            user_id = %ctx.user_id,
            keys = change.new_values.len(),
            "organization settings committed"
        );

        let entry = AuditEntry::settings_updated(ctx.user_id, org.id, change.new_values.clone());
        if let Err(e) = self.write_audit(entry).await {
            // The update is already durable; report and carry on
            tracing::error!(org_id = %org.id, "Failed to write audit entry: {:?}", e);
        }

        let event = ChangeEvent::settings_edited(org.id, ctx.user_id, change);
        if let Err(e) = self.event_recorder.record(&event).await {
            tracing::warn!(org_id = %org.id, "Failed to record change event: {:?}", e);
        }

        Ok(self.view(&org))
    }

    /// Audit sinks do blocking file I/O; run them on the blocking pool
    async fn write_audit(&self, entry: AuditEntry) -> anyhow::Result<()> {
        let sink = self.audit_sink.clone();
        tokio::task::spawn_blocking(move || sink.record(&entry)).await?
    }

        fn view(&self, org: &Organization) -> SettingsView {
        SettingsView {
            settings: merge_with_defaults(&self.defaults, &self.catalog, org),
        }
    }

    fn check_known_keys(&self, patch: &SettingsMap) -> Result<(), SettingsError> {
        if !self.strict_keys {
            return Ok(());
        }

        let mut unknown: Vec<String> = patch
            .keys()
            .filter(|key| !self.catalog.is_special(key) && !self.defaults.contains(key))
            .cloned()
            .collect();
        unknown.sort();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(SettingsError::UnknownSettings { keys: unknown })
        }
    }
}

/// Apply every key of `patch`, recording the value each key had before.
///
/// Special settings report their backing field; generic ones their effective
/// value, so a key still on its default reports the default.
fn apply_patch(
    catalog: &SettingsCatalog,
    defaults: &DefaultsRegistry,
    org: &mut Organization,
    patch: &SettingsMap,
) -> Result<ChangeRecord, SettingsError> {
    org.ensure_overrides();

    let mut change = ChangeRecord::default();
    for (key, value) in patch {
        let descriptor = catalog.descriptor_for(key);
        let previous = if catalog.is_special(key) {
            descriptor.read(org, key)
        } else {
            effective_value(defaults, org, key)
        };
        change.previous_values.insert(key.clone(), previous);
        descriptor.write(org, key, value.clone())?;
        change.new_values.insert(key.clone(), value.clone());
    }

    Ok(change)
}

fn ensure_admin(ctx: &AuthContext) -> Result<(), SettingsError> {
    if ctx.is_admin {
        Ok(())
    } else {
        Err(SettingsError::Forbidden {
            reason: "organization administrator role required".to_string(),
        })
    }
}

/// Domain errors raised inside a repository transaction pass through;
/// anything else is a storage failure.
fn repository_error(error: anyhow::Error) -> SettingsError {
    match error.downcast::<SettingsError>() {
        Ok(domain) => domain,
        Err(other) => {
            tracing::error!("Organization repository failure: {:?}", other);
            SettingsError::Internal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::GOOGLE_APPS_DOMAINS_KEY;
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn patch(value: Value) -> SettingsMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn apply_patch_records_previous_values() {
        let catalog = SettingsCatalog::default();
        let mut org = Organization::new(Uuid::new_v4(), "Acme", "acme");
        org.set_setting("date_format", json!("DD/MM/YY"));
        org.google_apps_domains = vec!["old.com".to_string()];

        let change = apply_patch(
            &catalog,
            &DefaultsRegistry::builtin(),
            &mut org,
            &patch(json!({
                "date_format": "YYYY-MM-DD",
                "time_format": "HH:mm:ss",
                "beacon_consent": true,
                GOOGLE_APPS_DOMAINS_KEY: ["new.com"],
            })),
        )
        .unwrap();

        // Override, default, null default, dedicated field
        assert_eq!(
            Value::Object(change.previous_values),
            json!({
                "date_format": "DD/MM/YY",
                "time_format": "HH:mm",
                "beacon_consent": null,
                GOOGLE_APPS_DOMAINS_KEY: ["old.com"],
            })
        );
        assert_eq!(change.new_values.len(), 4);
        assert_eq!(org.google_apps_domains, vec!["new.com".to_string()]);
        assert_eq!(org.get_setting("beacon_consent"), Some(&json!(true)));
        assert!(org.get_setting(GOOGLE_APPS_DOMAINS_KEY).is_none());
    }

    #[test]
    fn empty_patch_initialises_blob() {
        let mut org = Organization::new(Uuid::new_v4(), "Acme", "acme");

        let change = apply_patch(
            &SettingsCatalog::default(),
            &DefaultsRegistry::builtin(),
            &mut org,
            &SettingsMap::new(),
        )
        .unwrap();

        assert!(change.previous_values.is_empty());
        assert_eq!(org.overrides(), Some(&SettingsMap::new()));
    }

    #[test]
    fn non_admin_is_rejected() {
        let ctx = AuthContext::member(Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(
            ensure_admin(&ctx),
            Err(SettingsError::Forbidden { .. })
        ));
    }

    #[test]
    fn repository_error_keeps_domain_errors() {
        let err = anyhow::Error::from(SettingsError::Validation {
            message: "bad".to_string(),
        });
        assert_eq!(
            repository_error(err),
            SettingsError::Validation {
                message: "bad".to_string()
            }
        );
        assert_eq!(
            repository_error(anyhow::anyhow!("connection reset")),
            SettingsError::Internal
        );
    }
}
