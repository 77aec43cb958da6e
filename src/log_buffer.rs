use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, RwLock};

use crate::config::{LOG_BROADCAST_CAPACITY, LOG_BUFFER_SIZE};

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Bounded, newest-first event log shown in the dashboard's log panel.
///
/// Holds the most recent `LOG_BUFFER_SIZE` entries; appending at capacity
/// evicts the oldest. Live subscribers receive every entry through a
/// broadcast channel, so a reader that lags simply skips ahead.
pub struct LogBuffer {
    buffer: RwLock<VecDeque<LogEntry>>,
    sender: broadcast::Sender<LogEntry>,
    next_id: AtomicU64,
}

impl LogBuffer {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(LOG_BROADCAST_CAPACITY);
        Self {
            buffer: RwLock::new(VecDeque::with_capacity(LOG_BUFFER_SIZE)),
            sender,
            next_id: AtomicU64::new(1),
        }
    }

    /// Append an entry and return it. Never fails; the oldest entry is
    /// dropped once the buffer is full.
    pub async fn append(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        details: Option<String>,
    ) -> LogEntry {
        let entry = LogEntry {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            timestamp: Utc::now(),
            level,
            message: message.into(),
            details,
        };

        let mut buf = self.buffer.write().await;
        if buf.len() >= LOG_BUFFER_SIZE {
            buf.pop_back();
        }
        buf.push_front(entry.clone());
        drop(buf);

        let _ = self.sender.send(entry.clone());
        entry
    }

    pub async fn clear(&self) {
        self.buffer.write().await.clear();
    }

    /// Point-in-time view of the buffer, newest first.
    pub async fn snapshot(&self) -> Vec<LogEntry> {
        self.buffer.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.buffer.read().await.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}
