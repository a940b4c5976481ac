//! Input validation
//!
//! Every image that reaches the command line goes through here first: it must
//! decode as a volume, and its file name must be free of whitespace. A name
//! with whitespace is fixed by copying the file next to the original under
//! the sanitized name; the original is never touched.

use bentley::Reporter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, SienaError};
use crate::image::ImageProbe;
use crate::inputs::ImagingInput;

/// An input that decoded successfully and has a command-line safe path.
///
/// Only `Validator` hands these out, so any path built into a command has
/// been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedImage {
  name: String,
  path: PathBuf,
}

impl ValidatedImage {
  pub(crate) fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    Self { name: name.into(), path: path.into() }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// The path as a single command token
  pub fn token(&self) -> String {
    self.path.to_string_lossy().into_owned()
  }
}

/// Same directory, base name with every whitespace character replaced by `_`.
/// Names that are not valid UTF-8 are returned unchanged.
pub fn sanitized_path(path: &Path) -> PathBuf {
  let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
    return path.to_path_buf();
  };
  let sanitized: String =
    file_name.chars().map(|c| if c.is_whitespace() { '_' } else { c }).collect();
  if sanitized == file_name {
    path.to_path_buf()
  } else {
    path.with_file_name(sanitized)
  }
}

pub struct Validator<'a> {
  probe: &'a dyn ImageProbe,
  reporter: &'a dyn Reporter,
}

impl<'a> Validator<'a> {
  pub fn new(probe: &'a dyn ImageProbe, reporter: &'a dyn Reporter) -> Self {
    Self { probe, reporter }
  }

  pub fn validate(&self, input: &ImagingInput) -> Result<ValidatedImage> {
    let source = input.path.as_path();

    match self.probe.probe(source) {
      Ok(info) => {
        self.reporter.info(&format!("Valid NIfTI file provided {}: {}", input.name, source.display()));
        self.reporter.debug(&format!("{} volume: {info}", input.name));
      }
      Err(e) => {
        self.reporter.error(&format!(
          "Invalid NIfTI file provided for input {}: {}",
          input.name,
          source.display()
        ));
        return Err(SienaError::invalid_image_format(&input.name, source, e.to_string()));
      }
    }

    let target = sanitized_path(source);
    if target != source {
      self.reporter.info(&format!("{} filename contains whitespace: {}", input.name, source.display()));
      if target.exists() {
        self.reuse_existing(&input.name, source, &target)?;
      } else {
        fs::copy(source, &target).map_err(|e| SienaError::filesystem(&target, e))?;
        self.reporter.info(&format!("{} copied to: {}", input.name, target.display()));
      }
    }

    Ok(ValidatedImage::new(&input.name, target))
  }

  // A file already sits at the sanitized path. It is only usable when it is
  // a byte-for-byte copy of the source; anything else is left untouched.
  fn reuse_existing(&self, name: &str, source: &Path, target: &Path) -> Result<()> {
    let source_bytes = fs::read(source).map_err(|e| SienaError::filesystem(source, e))?;
    let target_bytes = fs::read(target).map_err(|e| SienaError::filesystem(target, e))?;
    if source_bytes != target_bytes {
      self.reporter.error(&format!(
        "{name} cannot be copied to {}: a different file already exists there",
        target.display()
      ));
      return Err(SienaError::filesystem(
        target,
        io::Error::new(io::ErrorKind::AlreadyExists, "a different file already exists"),
      ));
    }
    self.reporter.info(&format!("{name} already copied to: {}", target.display()));
    Ok(())
  }
}
