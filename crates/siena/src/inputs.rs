//! Request file loading
//!
//! A request bundles the analysis options with the input records supplied by
//! the platform. Each record points at a file on disk; nothing is opened here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::SienaConfig;
use crate::error::{Result, SienaError};

pub const FIRST_IMAGE: &str = "NIFTI_1";
pub const SECOND_IMAGE: &str = "NIFTI_2";
pub const SINGLE_IMAGE: &str = "NIFTI";
pub const VENTRICLE_MASK: &str = "ventricle_mask";
pub const LESION_MASK: &str = "lesion_mask";

const KNOWN_INPUTS: [&str; 5] = [FIRST_IMAGE, SECOND_IMAGE, SINGLE_IMAGE, VENTRICLE_MASK, LESION_MASK];

/// A supplied image reference that has not been validated yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagingInput {
  pub name: String,
  pub path: PathBuf,
}

impl ImagingInput {
  pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    Self { name: name.into(), path: path.into() }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
  pub path: PathBuf,
}

/// One entry under `inputs`. Extra platform metadata is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
  pub location: Location,
}

/// Primary images in command order, and supplied primaries left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimarySelection {
  pub images: Vec<ImagingInput>,
  pub ignored: Vec<ImagingInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
  #[serde(default)]
  pub config: SienaConfig,
  #[serde(default)]
  pub inputs: BTreeMap<String, InputRecord>,
}

impl AnalysisRequest {
  /// Load a request from a JSON file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content =
      std::fs::read_to_string(path).map_err(|e| SienaError::config_file(path, e.to_string()))?;
    Self::from_json(&content).map_err(|e| match e {
      SienaError::ConfigFile { message, .. } => SienaError::config_file(path, message),
      other => other,
    })
  }

  pub fn from_json(content: &str) -> Result<Self> {
    serde_json::from_str(content).map_err(|e| SienaError::config_file("<inline>", e.to_string()))
  }

  /// Add or replace an input record
  pub fn with_input(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
    self.inputs.insert(name.to_string(), InputRecord { location: Location { path: path.into() } });
    self
  }

  pub fn with_config(mut self, config: SienaConfig) -> Self {
    self.config = config;
    self
  }

  /// The record under `name`, carrying its lowercase logical name
  pub fn input(&self, name: &str) -> Option<ImagingInput> {
    self
      .inputs
      .get(name)
      .map(|record| ImagingInput::new(name.to_lowercase(), record.location.path.clone()))
  }

  /// Primary images chosen by slot.
  ///
  /// `NIFTI_1` and `NIFTI_2` together form the pair and win over `NIFTI`.
  /// Otherwise `NIFTI` is the scan and a half pair is ignored. A half pair on
  /// its own is rejected.
  pub fn primary_selection(&self) -> Result<PrimarySelection> {
    let first = self.input(FIRST_IMAGE);
    let second = self.input(SECOND_IMAGE);
    let single = self.input(SINGLE_IMAGE);

    match (first, second, single) {
      (Some(first), Some(second), single) => {
        Ok(PrimarySelection { images: vec![first, second], ignored: single.into_iter().collect() })
      }
      (first, second, Some(single)) => Ok(PrimarySelection {
        images: vec![single],
        ignored: first.into_iter().chain(second).collect(),
      }),
      (None, None, None) => Ok(PrimarySelection::default()),
      (Some(lone), None, None) | (None, Some(lone), None) => {
        Err(SienaError::invalid_configuration(format!(
          "{} supplied without its pair; supply both {FIRST_IMAGE} and {SECOND_IMAGE}, or {SINGLE_IMAGE}",
          lone.name.to_uppercase()
        )))
      }
    }
  }

  pub fn ventricle_mask(&self) -> Option<ImagingInput> {
    self.input(VENTRICLE_MASK)
  }

  pub fn lesion_mask(&self) -> Option<ImagingInput> {
    self.input(LESION_MASK)
  }

  /// Input names this tool does not know how to use
  pub fn unknown_inputs(&self) -> Vec<&str> {
    self.inputs.keys().map(String::as_str).filter(|name| !KNOWN_INPUTS.contains(name)).collect()
  }
}
