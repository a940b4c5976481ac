use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every failure is fatal: the pipeline stops where it is raised and no
/// partial command is ever executed.
#[derive(Error, Debug)]
pub enum SienaError {
  #[error("Invalid NIfTI file provided for input {name}: {} ({reason})", .path.display())]
  InvalidImageFormat { name: String, path: PathBuf, reason: String },

  #[error("Invalid configuration: {message}")]
  InvalidConfiguration { message: String },

  #[error("Filesystem error at {}: {source}", .path.display())]
  Filesystem {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Could not read request file {}: {message}", .path.display())]
  ConfigFile { path: PathBuf, message: String },

  #[error("Failed to launch {program}: {source}")]
  LaunchFailed {
    program: String,
    #[source]
    source: io::Error,
  },
}

impl SienaError {
  pub fn invalid_image_format(
    name: impl Into<String>,
    path: impl AsRef<Path>,
    reason: impl Into<String>,
  ) -> Self {
    Self::InvalidImageFormat {
      name: name.into(),
      path: path.as_ref().to_path_buf(),
      reason: reason.into(),
    }
  }

  pub fn invalid_configuration(message: impl Into<String>) -> Self {
    Self::InvalidConfiguration { message: message.into() }
  }

  pub fn filesystem(path: impl AsRef<Path>, source: io::Error) -> Self {
    Self::Filesystem { path: path.as_ref().to_path_buf(), source }
  }

  pub fn config_file(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
    Self::ConfigFile { path: path.as_ref().to_path_buf(), message: message.into() }
  }

  pub fn launch_failed(program: impl Into<String>, source: io::Error) -> Self {
    Self::LaunchFailed { program: program.into(), source }
  }
}

pub type Result<T> = std::result::Result<T, SienaError>;
