//! Process-wide defaults registry

use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Fallback values for recognized organization settings.
///
/// A `null` default means "no default": such a setting is only reported once
/// an organization stores an override for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultsRegistry {
    entries: BTreeMap<String, Value>,
}

impl DefaultsRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Organization defaults shipped with the application
    pub fn builtin() -> Self {
        [
            ("auth_password_login_enabled", json!(true)),
            ("auth_saml_enabled", json!(false)),
            ("auth_saml_type", json!("")),
            ("auth_saml_entity_id", json!("")),
            ("auth_saml_metadata_url", json!("")),
            ("auth_saml_nameid_format", json!("")),
            ("auth_saml_sso_url", json!("")),
            ("auth_saml_x509_cert", json!("")),
            ("auth_jwt_login_enabled", json!(false)),
            ("auth_jwt_auth_issuer", json!("")),
            ("auth_jwt_auth_public_certs_url", json!("")),
            ("auth_jwt_auth_audience", json!("")),
            ("auth_jwt_auth_algorithms", json!(["HS256", "RS256", "ES256"])),
            ("auth_jwt_auth_cookie_name", json!("")),
            ("auth_jwt_auth_header_name", json!("")),
            ("date_format", json!("DD/MM/YY")),
            ("time_format", json!("HH:mm")),
            ("integer_format", json!("0,0")),
            ("float_format", json!("0,0.00")),
            ("multi_byte_search_enabled", json!(false)),
            ("feature_show_permissions_control", json!(false)),
            ("send_email_on_failed_scheduled_queries", json!(false)),
            ("hide_plotly_mode_bar", json!(false)),
            ("disable_public_urls", json!(false)),
            ("beacon_consent", Value::Null),
        ]
        .into_iter()
        .collect()
    }

    /// Add or replace entries
    pub fn with_overrides<I, K>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.entries
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for DefaultsRegistry {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self::new().with_overrides(iter)
    }
}
