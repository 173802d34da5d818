//! Setting descriptors: how each setting key is read from and written to an
//! organization.
//!
//! Most keys live in the generic settings blob. A few legacy settings are
//! backed by dedicated organization fields; each of those gets its own
//! descriptor registered in the [`SettingsCatalog`].

use crate::contract::{Organization, SettingsError, GOOGLE_APPS_DOMAINS_KEY};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read/write capability for one setting
pub trait SettingDescriptor: Send + Sync {
    /// Current stored value of `key`; `null` when unset
    fn read(&self, org: &Organization, key: &str) -> Value;

    /// Store `value` under `key`
    fn write(&self, org: &mut Organization, key: &str, value: Value) -> Result<(), SettingsError>;
}

/// Setting stored in the organization's generic settings blob
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericSetting;

impl SettingDescriptor for GenericSetting {
    fn read(&self, org: &Organization, key: &str) -> Value {
        org.get_setting(key).cloned().unwrap_or(Value::Null)
    }

    fn write(&self, org: &mut Organization, key: &str, value: Value) -> Result<(), SettingsError> {
        org.set_setting(key, value);
        Ok(())
    }
}

/// Allowed Google Apps domains, backed by `Organization::google_apps_domains`
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleAppsDomainsSetting;

impl SettingDescriptor for GoogleAppsDomainsSetting {
    fn read(&self, org: &Organization, _key: &str) -> Value {
        Value::from(org.google_apps_domains.clone())
    }

    fn write(&self, org: &mut Organization, key: &str, value: Value) -> Result<(), SettingsError> {
        let domains: Vec<String> =
            serde_json::from_value(value).map_err(|_| SettingsError::Validation {
                message: format!("'{}' must be a list of domain names", key),
            })?;
        org.google_apps_domains = domains;
        Ok(())
    }
}

/// Dispatch table from setting key to descriptor
#[derive(Clone)]
pub struct SettingsCatalog {
    special: BTreeMap<String, Arc<dyn SettingDescriptor>>,
    generic: Arc<dyn SettingDescriptor>,
}

impl SettingsCatalog {
    /// Catalog with no special settings
    pub fn empty() -> Self {
        Self {
            special: BTreeMap::new(),
            generic: Arc::new(GenericSetting),
        }
    }

    /// Register a descriptor for a dedicated-field setting
    pub fn with_special(
        mut self,
        key: impl Into<String>,
        descriptor: Arc<dyn SettingDescriptor>,
    ) -> Self {
        self.special.insert(key.into(), descriptor);
        self
    }

    /// Descriptor responsible for `key`
    pub fn descriptor_for(&self, key: &str) -> &dyn SettingDescriptor {
        self.special
            .get(key)
            .map(|d| d.as_ref())
            .unwrap_or(self.generic.as_ref())
    }

    pub fn is_special(&self, key: &str) -> bool {
        self.special.contains_key(key)
    }

    /// Special settings, in key order
    pub fn special(&self) -> impl Iterator<Item = (&str, &dyn SettingDescriptor)> {
        self.special.iter().map(|(k, d)| (k.as_str(), d.as_ref()))
    }
}

impl Default for SettingsCatalog {
    fn default() -> Self {
        Self::empty().with_special(GOOGLE_APPS_DOMAINS_KEY, Arc::new(GoogleAppsDomainsSetting))
    }
}

impl std::fmt::Debug for SettingsCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsCatalog")
            .field("special", &self.special.keys().collect::<Vec<_>>())
            .finish()
    }
}
