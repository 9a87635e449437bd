//! Append-only log of API requests.
//!
//! Each request adds one line to a plain text file:
//!
//! ```text
//! [2024-05-25 14:03:11] /extract/payroll - lonebesked_maj.pdf - success
//! [2024-05-25 14:04:02] /extract/payroll - notes.txt - error - ERROR: File must be a PDF
//! ```
//!
//! Writing the log is best effort. Failures are reported through `tracing`
//! and never reach the client.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

/// Whether a request succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request was served normally.
    Success,
    /// The request ended in an error response.
    Error,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Error => write!(f, "error"),
        }
    }
}

/// One line of the request log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the request finished.
    pub timestamp: NaiveDateTime,
    /// Route that served the request.
    pub endpoint: String,
    /// Filename supplied by the client.
    pub filename: String,
    /// Success or error.
    pub outcome: Outcome,
    /// Error description, for failed requests.
    pub error_message: Option<String>,
}

impl LogEntry {
    /// A successful request, stamped with the current local time.
    pub fn success(endpoint: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            endpoint: endpoint.into(),
            filename: filename.into(),
            outcome: Outcome::Success,
            error_message: None,
        }
    }

    /// A failed request, stamped with the current local time.
    pub fn error(
        endpoint: impl Into<String>,
        filename: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            endpoint: endpoint.into(),
            filename: filename.into(),
            outcome: Outcome::Error,
            error_message: Some(message.into()),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.endpoint,
            self.filename,
            self.outcome
        )?;
        if let Some(message) = &self.error_message {
            write!(f, " - ERROR: {}", message)?;
        }
        Ok(())
    }
}

/// Request log shared by all handlers.
///
/// Appends are serialized through a mutex so lines from concurrent
/// requests never interleave.
#[derive(Debug)]
pub struct RequestLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RequestLog {
    /// Creates a log writing to `path`. Nothing is touched until the first
    /// entry is recorded.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `entry`, logging a warning if the file cannot be written.
    pub async fn record(&self, entry: &LogEntry) {
        if let Err(err) = self.append(entry).await {
            warn!(
                path = %self.path.display(),
                error = %err,
                "Failed to write to API log"
            );
        }
    }

    async fn append(&self, entry: &LogEntry) -> std::io::Result<()> {
        // Line endings are the only thing separating entries.
        let line = format!("{}\n", entry.to_string().replace(['\r', '\n'], " "));

        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}
