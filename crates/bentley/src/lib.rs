//! ## Features
//!
//! - Standard logging levels (debug, info, warn, error)
//! - Multi-line message support with consistent formatting
//! - A `Reporter` trait so callers receive their logger instead of reaching
//!   for global state
//! - Console, `tracing`-backed and in-memory reporters
//! - All console output to stderr
//!
//! ## Usage
//!
//! Standard logging functions: `info()`, `warn()`, `error()`, `debug()`
//!
//! Injected logging: `Console::new(verbose)`, `Structured`, `Recorder::new()`

use colored::*;
use std::fmt;

mod recorder;

pub use recorder::{LogEntry, Recorder};

/// Core logging function that handles the actual output
fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Format a colored prefix for log messages
fn format_prefix(color: Color, prefix: &str) -> String {
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = 7usize.saturating_sub(prefix.len() + 2))
}

/// Create a banner line of the specified length and character
pub fn banner_line(length: usize, char: char) -> String {
  char.to_string().repeat(length)
}

/// Display a message with a banner around it
pub fn as_banner<F>(log_fn: F, message: &str, width: Option<usize>, border_char: Option<char>)
where
  F: Fn(&str),
{
  let width = width.unwrap_or(50);
  let border_char = border_char.unwrap_or('=');

  let banner = banner_line(width, border_char);

  log_fn(&banner);
  log_fn(message);
  log_fn(&banner);
}

fn log_with_prefix(color: Color, prefix: &str, message: &str) {
  let prefix = format_prefix(color, prefix);
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Info level logging - general information
pub fn info(message: &str) {
  log_with_prefix(Color::Blue, "info", message);
}

/// Warning level logging - something needs attention
pub fn warn(message: &str) {
  log_with_prefix(Color::Yellow, "warn", message);
}

/// Error level logging - something went wrong
pub fn error(message: &str) {
  log_with_prefix(Color::Red, "error", message);
}

/// Debug level logging - detailed diagnostic information
pub fn debug(message: &str) {
  log_with_prefix(Color::Magenta, "debug", message);
}

/// Theatrical announcement - for important but not critical messages
pub fn announce(message: &str) {
  as_banner(|msg| log(&msg.blue().bold().to_string()), message, Some(50), Some('-'));
}

/// Severity attached to every reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
  Debug,
  Info,
  Warn,
  Error,
}

impl Level {
  pub fn as_str(&self) -> &'static str {
    match self {
      Level::Debug => "debug",
      Level::Info => "info",
      Level::Warn => "warn",
      Level::Error => "error",
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Logging collaborator handed to components that need to report progress.
///
/// Implementors only provide `log`; the level helpers forward to it.
pub trait Reporter {
  fn log(&self, level: Level, message: &str);

  fn debug(&self, message: &str) {
    self.log(Level::Debug, message);
  }

  fn info(&self, message: &str) {
    self.log(Level::Info, message);
  }

  fn warn(&self, message: &str) {
    self.log(Level::Warn, message);
  }

  fn error(&self, message: &str) {
    self.log(Level::Error, message);
  }
}

impl<R: Reporter + ?Sized> Reporter for &R {
  fn log(&self, level: Level, message: &str) {
    (**self).log(level, message);
  }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
  fn log(&self, level: Level, message: &str) {
    (**self).log(level, message);
  }
}

/// Colored, prefixed stderr output. Debug lines are dropped unless verbose.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
  verbose: bool,
}

impl Console {
  pub fn new(verbose: bool) -> Self {
    Self { verbose }
  }

  pub fn is_verbose(&self) -> bool {
    self.verbose
  }
}

impl Reporter for Console {
  fn log(&self, level: Level, message: &str) {
    match level {
      Level::Debug if self.verbose => debug(message),
      Level::Debug => {}
      Level::Info => info(message),
      Level::Warn => warn(message),
      Level::Error => error(message),
    }
  }
}

/// Forwards every message to `tracing` as an event at the matching level.
///
/// Filtering and formatting belong to whichever subscriber the binary installs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Structured;

impl Reporter for Structured {
  fn log(&self, level: Level, message: &str) {
    match level {
      Level::Debug => tracing::debug!(target: "bentley", "{message}"),
      Level::Info => tracing::info!(target: "bentley", "{message}"),
      Level::Warn => tracing::warn!(target: "bentley", "{message}"),
      Level::Error => tracing::error!(target: "bentley", "{message}"),
    }
  }
}
