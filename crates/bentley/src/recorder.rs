//! In-memory log capture
//!
//! Keeps every reported message with its level and timestamp so tests can
//! assert on what a component said without scraping stderr.

use chrono::{DateTime, Utc};
use std::cell::RefCell;

use crate::{Level, Reporter};

/// A single captured message
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
  pub timestamp: DateTime<Utc>,
  pub level: Level,
  pub message: String,
}

/// Reporter that records instead of printing
#[derive(Debug, Default)]
pub struct Recorder {
  entries: RefCell<Vec<LogEntry>>,
}

impl Recorder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot of everything recorded so far, oldest first
  pub fn entries(&self) -> Vec<LogEntry> {
    self.entries.borrow().clone()
  }

  /// Messages recorded at exactly `level`
  pub fn messages_at(&self, level: Level) -> Vec<String> {
    self
      .entries
      .borrow()
      .iter()
      .filter(|entry| entry.level == level)
      .map(|entry| entry.message.clone())
      .collect()
  }

  /// True when some message at `level` contains `needle`
  pub fn contains(&self, level: Level, needle: &str) -> bool {
    self.entries.borrow().iter().any(|entry| entry.level == level && entry.message.contains(needle))
  }

  pub fn len(&self) -> usize {
    self.entries.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.borrow().is_empty()
  }

  pub fn clear(&self) {
    self.entries.borrow_mut().clear();
  }
}

impl Reporter for Recorder {
  fn log(&self, level: Level, message: &str) {
    self.entries.borrow_mut().push(LogEntry {
      timestamp: Utc::now(),
      level,
      message: message.to_string(),
    });
  }
}
