//! Process launch boundary
//!
//! The external tool is opaque; all this side does is show the command for
//! the audit trail and hand it to the operating system.

use std::process::Command;

use crate::command::CommandSpec;
use crate::error::{Result, SienaError};

/// Exit status reported when the tool dies without one (killed by a signal)
pub const SIGNALLED_EXIT_CODE: i32 = 1;

#[cfg_attr(test, mockall::automock)]
pub trait ProcessLauncher {
  /// Display then run `command`, blocking until it exits. Returns its status.
  fn execute(&self, command: &CommandSpec) -> Result<i32>;
}

/// Runs the tool found on `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
  fn execute(&self, command: &CommandSpec) -> Result<i32> {
    println!("{command}");

    let status = Command::new(command.program())
      .args(command.args())
      .status()
      .map_err(|e| SienaError::launch_failed(command.program(), e))?;

    Ok(status.code().unwrap_or(SIGNALLED_EXIT_CODE))
  }
}

/// Displays the command and reports success without running anything
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunLauncher;

impl ProcessLauncher for DryRunLauncher {
  fn execute(&self, command: &CommandSpec) -> Result<i32> {
    println!("{command}");
    Ok(0)
  }
}
