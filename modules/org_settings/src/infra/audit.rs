//! Size-rotated audit log file

use crate::config::AuditConfig;
use crate::domain::audit::{AuditEntry, AuditSink};
use anyhow::Context;
use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use parking_lot::Mutex;
use std::io::Write;

const LEVEL: &str = "INFO";

/// Audit sink appending one line per entry:
/// `<timestamp> - <logger-name> - INFO - <message>`
pub struct FileAuditSink {
    logger_name: String,
    writer: Mutex<FileRotate<AppendCount>>,
}

impl FileAuditSink {
    /// Open (or create) the audit log described by `config`
    pub fn open(config: &AuditConfig) -> anyhow::Result<Self> {
        if let Some(dir) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating audit log directory {}", dir.display()))?;
        }

        let writer = FileRotate::new(
            &config.path,
            AppendCount::new(config.backup_count),
            ContentLimit::BytesSurpassed(config.max_bytes),
            Compression::None,
            #[cfg(unix)]
            None,
        );

        tracing::info!(
            path = %config.path.display(),
            max_bytes = config.max_bytes,
            backup_count = config.backup_count,
            "Audit log opened"
        );

        Ok(Self {
            logger_name: config.logger_name.clone(),
            writer: Mutex::new(writer),
        })
    }

    fn format_line(&self, entry: &AuditEntry) -> String {
        format!(
            "{} - {} - {} - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            self.logger_name,
            LEVEL,
            entry.message()
        )
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        let line = self.format_line(entry);
        let mut writer = self.writer.lock();
        writer
            .write_all(line.as_bytes())
            .context("writing audit entry")?;
        writer.flush().context("flushing audit log")?;
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        self.writer.lock().flush().context("flushing audit log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn config(dir: &std::path::Path) -> AuditConfig {
        AuditConfig {
            path: dir.join("logs").join("audit.log"),
            ..AuditConfig::default()
        }
    }

    fn entry() -> AuditEntry {
        AuditEntry::settings_updated(
            Uuid::new_v4(),
            Uuid::new_v4(),
            json!({"date_format": "YYYY-MM-DD"}).as_object().cloned().unwrap(),
        )
    }

    #[test]
    fn writes_formatted_line() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        let sink = FileAuditSink::open(&cfg).unwrap();
        let entry = entry();

        sink.record(&entry).unwrap();

        let contents = std::fs::read_to_string(&cfg.path).unwrap();
        let line = contents.lines().next().unwrap();
        let parts: Vec<&str> = line.splitn(4, " - ").collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].len(), "2024-01-01 00:00:00,000".len());
        assert_eq!(parts[1], "org_settings_audit");
        assert_eq!(parts[2], "INFO");
        assert_eq!(parts[3], entry.message());
    }

    #[test]
    fn appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());

        FileAuditSink::open(&cfg).unwrap().record(&entry()).unwrap();
        FileAuditSink::open(&cfg).unwrap().record(&entry()).unwrap();

        let contents = std::fs::read_to_string(&cfg.path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn rotates_with_bounded_backups() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AuditConfig {
            max_bytes: 256,
            backup_count: 2,
            ..config(dir.path())
        };
        let sink = FileAuditSink::open(&cfg).unwrap();

        for _ in 0..20 {
            sink.record(&entry()).unwrap();
        }
        sink.flush().unwrap();

        let logs = cfg.path.parent().unwrap();
        assert!(cfg.path.exists());
        assert!(logs.join("audit.log.1").exists());
        assert!(logs.join("audit.log.2").exists());
        assert!(!logs.join("audit.log.3").exists());
    }
}
