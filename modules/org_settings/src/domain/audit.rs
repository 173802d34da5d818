//! Audit trail of settings mutations
//!
//! The sink is constructed explicitly and handed to the service. The
//! rotating file implementation lives in `infra::audit`.

use crate::contract::SettingsMap;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::Value;
use std::io;
use uuid::Uuid;

/// One audited settings update
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub user_id: Uuid,
    pub org_id: Uuid,
    /// Payload exactly as submitted
    pub payload: SettingsMap,
}

impl AuditEntry {
    pub fn settings_updated(user_id: Uuid, org_id: Uuid, payload: SettingsMap) -> Self {
        Self {
            user_id,
            org_id,
            payload,
        }
    }

    /// Human-readable audit message. The payload keeps the submitted key
    /// order and is rendered as `{"a": 5, "b": [1, 2]}`.
    pub fn message(&self) -> String {
        format!(
            "User {} updated settings for organization {}: {}",
            self.user_id,
            self.org_id,
            render_payload(&self.payload)
        )
    }
}

/// Single-line JSON with a space after `:` and `,`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn render_payload(payload: &SettingsMap) -> String {
    let mut serializer = Serializer::with_formatter(Vec::new(), SpacedFormatter);
    match payload.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(serializer.into_inner())
            .unwrap_or_else(|_| Value::Object(payload.clone()).to_string()),
        Err(_) => Value::Object(payload.clone()).to_string(),
    }
}

/// Append-only audit sink
pub trait AuditSink: Send + Sync {
    /// Append one entry
    fn record(&self, entry: &AuditEntry) -> anyhow::Result<()>;

    /// Flush buffered entries
    fn flush(&self) -> anyhow::Result<()>;
}

/// Sink that discards entries
pub struct NoOpAuditSink;

impl AuditSink for NoOpAuditSink {
    fn record(&self, _entry: &AuditEntry) -> anyhow::Result<()> {
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
