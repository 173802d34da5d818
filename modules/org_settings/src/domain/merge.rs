//! Merge of registry defaults with an organization's stored overrides

use super::defaults::DefaultsRegistry;
use super::descriptor::SettingsCatalog;
use crate::contract::{Organization, SettingsMap};
use serde_json::Value;

/// Effective settings of `org`.
///
/// A setting whose override and default are both `null` is left out.
/// Special settings are always present and take their value from the
/// organization field backing them.
pub fn merge_with_defaults(
    defaults: &DefaultsRegistry,
    catalog: &SettingsCatalog,
    org: &Organization,
) -> SettingsMap {
    let mut settings = SettingsMap::new();

    for (name, _) in defaults.iter() {
        let value = effective_value(defaults, org, name);
        if !value.is_null() {
            settings.insert(name.to_string(), value);
        }
    }

    for (name, descriptor) in catalog.special() {
        settings.insert(name.to_string(), descriptor.read(org, name));
    }

    settings
}

/// Value `org` uses for a generic setting: the stored override, else the
/// registry default, else `null`
pub fn effective_value(defaults: &DefaultsRegistry, org: &Organization, key: &str) -> Value {
    org.get_setting(key)
        .or_else(|| defaults.get(key))
        .cloned()
        .unwrap_or(Value::Null)
}
