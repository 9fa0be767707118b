// src/telemetry.rs

//! Debug panel sink with server-style formatting.
//!
//! Every entry is mirrored to the `log` facade and kept in a bounded FIFO
//! that the view layer can show. Recording never fails and never blocks on
//! a poisoned lock.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

/// Severity tag attached to each debug entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

/// One line of the debug panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugEntry {
    pub at: DateTime<Utc>,
    pub level: Severity,
    pub message: String,
}

impl fmt::Display for DebugEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Anything that accepts severity-tagged diagnostics.
pub trait DebugSink: Send + Sync {
    fn record(&self, level: Severity, message: &str);
}

/// Bounded in-memory debug log; the oldest entry is dropped first.
#[derive(Debug)]
pub struct DebugLog {
    capacity: usize,
    entries: Mutex<VecDeque<DebugEntry>>,
}

impl DebugLog {
    pub const DEFAULT_CAPACITY: usize = 200;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the retained entries, newest first.
    pub fn entries(&self) -> Vec<DebugEntry> {
        self.lock().iter().rev().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<DebugEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl DebugSink for DebugLog {
    fn record(&self, level: Severity, message: &str) {
        match level {
            Severity::Info => log::info!("{message}"),
            Severity::Success => log::info!("✓ {message}"),
            Severity::Warn => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
        }

        let mut entries = self.lock();
        entries.push_back(DebugEntry {
            at: Utc::now(),
            level,
            message: message.to_string(),
        });
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }
}
