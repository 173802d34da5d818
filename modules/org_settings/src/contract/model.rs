//! Contract models for the organization settings service
//!
//! These models are transport-agnostic and used for inter-module communication.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Flat mapping of setting name to JSON value
pub type SettingsMap = serde_json::Map<String, Value>;

/// Key inside the organization attributes that holds the generic overrides
pub const SETTINGS_ATTRIBUTE: &str = "settings";

/// Setting key clients use to address the allowed authentication domains
pub const GOOGLE_APPS_DOMAINS_KEY: &str = "auth_google_apps_domains";

/// Organization with its stored setting overrides
#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    /// Organization ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// Persisted attributes; generic overrides live under [`SETTINGS_ATTRIBUTE`]
    pub settings: SettingsMap,
    /// Email domains permitted for Google Apps authentication
    pub google_apps_domains: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Create an organization with no stored settings
    pub fn new(id: Uuid, name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            settings: SettingsMap::new(),
            google_apps_domains: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored overrides, if the organization has a settings blob yet
    pub fn overrides(&self) -> Option<&SettingsMap> {
        self.settings.get(SETTINGS_ATTRIBUTE).and_then(Value::as_object)
    }

    /// Initialise the overrides blob to an empty object when missing or
    /// not an object
    pub fn ensure_overrides(&mut self) {
        if self.overrides().is_none() {
            self.settings.insert(
                SETTINGS_ATTRIBUTE.to_string(),
                Value::Object(SettingsMap::new()),
            );
        }
    }

    /// Stored override for `key`. A stored `null` counts as unset.
    pub fn get_setting(&self, key: &str) -> Option<&Value> {
        self.overrides()
            .and_then(|values| values.get(key))
            .filter(|value| !value.is_null())
    }

    /// Store an override for `key`
    pub fn set_setting(&mut self, key: impl Into<String>, value: Value) {
        let mut overrides = match self.settings.remove(SETTINGS_ATTRIBUTE) {
            Some(Value::Object(map)) => map,
            _ => SettingsMap::new(),
        };
        overrides.insert(key.into(), value);
        self.settings
            .insert(SETTINGS_ATTRIBUTE.to_string(), Value::Object(overrides));
    }
}

/// Merged view returned by both GET and POST
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsView {
    /// Effective settings (defaults + overrides + special fields)
    pub settings: SettingsMap,
}

/// Previous and new values for the keys of one update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeRecord {
    /// Value of each submitted key before the update (`null` when unset)
    pub previous_values: SettingsMap,
    /// Submitted values
    pub new_values: SettingsMap,
}

/// Authentication context of the caller, bound to the current organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Acting user
    pub user_id: Uuid,
    /// Organization the request is scoped to
    pub org_id: Uuid,
    /// Whether the user administers `org_id`
    pub is_admin: bool,
}

impl AuthContext {
    /// Create an administrator context
    pub fn admin(user_id: Uuid, org_id: Uuid) -> Self {
        Self {
            user_id,
            org_id,
            is_admin: true,
        }
    }

    /// Create a regular member context
    pub fn member(user_id: Uuid, org_id: Uuid) -> Self {
        Self {
            user_id,
            org_id,
            is_admin: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overrides_are_initialised_on_first_write() {
        let mut org = Organization::new(Uuid::new_v4(), "Acme", "acme");
        assert!(org.overrides().is_none());

        org.set_setting("date_format", json!("YYYY-MM-DD"));

        assert_eq!(
            org.settings,
            json!({"settings": {"date_format": "YYYY-MM-DD"}})
                .as_object()
                .cloned()
                .unwrap()
        );
    }

    #[test]
    fn non_object_blob_is_replaced() {
        let mut org = Organization::new(Uuid::new_v4(), "Acme", "acme");
        org.settings.insert(SETTINGS_ATTRIBUTE.to_string(), json!("garbage"));

        assert!(org.overrides().is_none());
        org.set_setting("a", json!(1));
        assert_eq!(org.get_setting("a"), Some(&json!(1)));
    }

    #[test]
    fn ensure_overrides_keeps_existing_values() {
        let mut org = Organization::new(Uuid::new_v4(), "Acme", "acme");
        org.ensure_overrides();
        assert_eq!(org.overrides(), Some(&SettingsMap::new()));

        org.set_setting("a", json!(1));
        org.ensure_overrides();
        assert_eq!(org.get_setting("a"), Some(&json!(1)));

        org.settings.insert(SETTINGS_ATTRIBUTE.to_string(), json!([1, 2]));
        org.ensure_overrides();
        assert_eq!(org.overrides(), Some(&SettingsMap::new()));
    }

    #[test]
    fn stored_null_reads_as_unset() {
        let mut org = Organization::new(Uuid::new_v4(), "Acme", "acme");
        org.set_setting("beacon_consent", Value::Null);
        assert!(org.get_setting("beacon_consent").is_none());
    }
}
