//! Configuration for the organization settings module

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Organization settings module configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Extra or replacement defaults, merged over the built-in registry
    #[serde(default)]
    pub defaults: BTreeMap<String, Value>,

    /// Start from the built-in organization defaults
    #[serde(default = "default_true")]
    pub include_builtin_defaults: bool,

    /// Reject updates to keys the defaults registry does not know
    #[serde(default = "default_true")]
    pub strict_keys: bool,

    /// Audit log file
    #[serde(default)]
    pub audit: AuditConfig,

    /// Where change events go
    #[serde(default)]
    pub events: EventSinkKind,

    /// Static API keys accepted by the REST layer
    #[serde(default)]
    pub api_keys: Vec<ApiKeyConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: BTreeMap::new(),
            include_builtin_defaults: true,
            strict_keys: true,
            audit: AuditConfig::default(),
            events: EventSinkKind::default(),
            api_keys: Vec::new(),
        }
    }
}

/// Audit log file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Log file path; rotated files get `.1`, `.2`, ... suffixes
    #[serde(default = "default_audit_path")]
    pub path: PathBuf,

    /// Rotate once the file grows past this many bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Rotated files to keep
    #[serde(default = "default_backup_count")]
    pub backup_count: usize,

    /// Logger name written on every line
    #[serde(default = "default_logger_name")]
    pub logger_name: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: default_audit_path(),
            max_bytes: default_max_bytes(),
            backup_count: default_backup_count(),
            logger_name: default_logger_name(),
        }
    }
}

/// Change event destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSinkKind {
    /// `events` table
    #[default]
    Database,
    /// Structured log records
    Log,
    /// Dropped
    None,
}

/// API key bound to one user of one organization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiKeyConfig {
    pub key: String,
    pub user_id: Uuid,
    pub org_id: Uuid,
    #[serde(default)]
    pub admin: bool,
}

fn default_true() -> bool {
    true
}

fn default_audit_path() -> PathBuf {
    PathBuf::from("logs/audit.log")
}

fn default_max_bytes() -> usize {
    10_000_000
}

fn default_backup_count() -> usize {
    5
}

fn default_logger_name() -> String {
    "org_settings_audit".to_string()
}
