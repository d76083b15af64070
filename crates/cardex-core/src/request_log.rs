use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use crate::error::CardexError;
use crate::models::RequestLogEntry;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "requests.jsonl";

/// Append-only JSONL log of facade operations. Write failures are swallowed.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestLog {
    path: Option<PathBuf>,
}

impl RequestLog {
    pub(crate) fn under_root(root: &Path) -> Self {
        Self {
            path: Some(root.join(LOG_DIR).join(LOG_FILE)),
        }
    }

    pub(crate) const fn disabled() -> Self {
        Self { path: None }
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn try_append(&self, entry: &RequestLogEntry) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        let Ok(mut line) = serde_json::to_string(entry) else {
            return;
        };
        line.push('\n');
        let written = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| OpenOptions::new().create(true).append(true).open(path))
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(err) = written {
            debug!(path = %path.display(), error = %err, "request log append failed");
        }
    }

    pub(crate) fn log_status(
        &self,
        request_id: String,
        operation: &str,
        started: Instant,
        details: Option<serde_json::Value>,
    ) {
        self.try_append(&RequestLogEntry {
            request_id,
            operation: operation.to_string(),
            status: "ok".to_string(),
            latency_ms: started.elapsed().as_millis(),
            created_at: Utc::now().to_rfc3339(),
            error_code: None,
            error_message: None,
            details,
        });
    }

    pub(crate) fn log_error(
        &self,
        request_id: String,
        operation: &str,
        started: Instant,
        err: &CardexError,
        details: Option<serde_json::Value>,
    ) {
        self.try_append(&RequestLogEntry {
            request_id,
            operation: operation.to_string(),
            status: "error".to_string(),
            latency_ms: started.elapsed().as_millis(),
            created_at: Utc::now().to_rfc3339(),
            error_code: Some(err.code().to_string()),
            error_message: Some(err.to_string()),
            details,
        });
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::jsonl::decode_lines;

    #[test]
    fn appends_one_line_per_entry() {
        let temp = tempdir().expect("tempdir");
        let log = RequestLog::under_root(temp.path());
        log.log_status("r1".to_string(), "search", Instant::now(), None);
        log.log_error(
            "r2".to_string(),
            "search",
            Instant::now(),
            &CardexError::EmptyQuery,
            Some(serde_json::json!({"query": ""})),
        );

        let raw = fs::read_to_string(log.path().expect("path")).expect("read log");
        let parsed = decode_lines::<RequestLogEntry>(&raw);
        assert_eq!(parsed.skipped_lines, 0);
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].status, "ok");
        assert_eq!(parsed.items[1].error_code.as_deref(), Some("EMPTY_QUERY"));
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let log = RequestLog::disabled();
        log.log_status("r1".to_string(), "search", Instant::now(), None);
        assert!(log.path().is_none());
    }
}
