//! Append-only audit log for the submission pipeline.
//!
//! Every admission decision is recorded as one JSON line so operators
//! can reconstruct why a score was or was not accepted. Logging is
//! strictly best-effort: a failed write is reported through tracing and
//! otherwise ignored, because the audit trail must never take down the
//! submission path itself.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::Mutex;

use serde::Serialize;
use tracing::error;

/// One auditable moment in a submission's lifecycle.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SubmissionEvent {
    SubmissionAccepted {
        source: String,
        score: i64,
        difficulty: String,
        rank: Option<u32>,
    },
    SubmissionRejected {
        source: String,
        score: i64,
        reason: &'static str,
    },
    SubmissionThrottled {
        source: String,
    },
    StoreFailure {
        context: &'static str,
        error: String,
    },
}

#[derive(Serialize)]
struct LogLine<'a> {
    timestamp_ms: i64,
    #[serde(flatten)]
    event: &'a SubmissionEvent,
}

/// JSON-lines event sink appending to a log file.
pub struct EventLogger {
    writer: Mutex<BufWriter<File>>,
}

impl EventLogger {
    pub fn new(path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Append one event. Never fails; write errors are traced and dropped.
    pub fn log(&self, event: SubmissionEvent) {
        let line = LogLine {
            timestamp_ms: crate::leaderboard::unix_time_ms(),
            event: &event,
        };
        let json = match serde_json::to_string(&line) {
            Ok(json) => json,
            Err(err) => {
                error!(%err, "failed to serialize audit event");
                return;
            }
        };
        if let Ok(mut writer) = self.writer.lock() {
            if let Err(err) = writeln!(writer, "{json}").and_then(|_| writer.flush()) {
                error!(%err, "failed to append audit event");
            }
        }
    }
}
