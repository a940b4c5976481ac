//! Command assembly
//!
//! Turns validated images plus options into the exact argument list for
//! `siena` (two time points) or `sienax` (one time point). Token order is
//! fixed: tool, image paths, shared flags, mode flags, mask, output directory.

use std::fmt;
use std::path::Path;

use crate::config::{quote_option, SienaConfig};
use crate::error::{Result, SienaError};
use crate::validator::ValidatedImage;

pub const OUTPUT_DIR_FLAG: &str = "-o";
pub const VENTRICLE_MASK_FLAG: &str = "-v";
pub const LESION_MASK_FLAG: &str = "-lm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
  /// Brain volume change between two scans (`siena`)
  PairedComparison,
  /// Cross-sectional brain volume of one scan (`sienax`)
  SingleScan,
}

impl AnalysisMode {
  pub fn tool(&self) -> &'static str {
    match self {
      AnalysisMode::PairedComparison => "siena",
      AnalysisMode::SingleScan => "sienax",
    }
  }

  /// Pick the mode from how many primary images were selected.
  ///
  /// Two images always mean a paired comparison, whatever the single-input
  /// flag says. Slot selection upstream never yields more than two.
  pub fn select(primary_count: usize, single_input_paired: bool) -> Result<Self> {
    match primary_count {
      2 => Ok(AnalysisMode::PairedComparison),
      1 if single_input_paired => Ok(AnalysisMode::PairedComparison),
      1 => Ok(AnalysisMode::SingleScan),
      0 => Err(SienaError::invalid_configuration("no primary image supplied")),
      n => Err(SienaError::invalid_configuration(format!(
        "{n} primary images supplied, expected one or two"
      ))),
    }
  }
}

impl fmt::Display for AnalysisMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.tool().to_uppercase())
  }
}

/// Validated images available to the builder
#[derive(Debug, Clone, Default)]
pub struct ValidatedInputs {
  pub primary: Vec<ValidatedImage>,
  pub ventricle_mask: Option<ValidatedImage>,
  pub lesion_mask: Option<ValidatedImage>,
}

/// Ordered argument list for one tool invocation. The first token is always
/// the tool name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  mode: AnalysisMode,
  tokens: Vec<String>,
}

impl CommandSpec {
  fn new(mode: AnalysisMode) -> Self {
    Self { mode, tokens: vec![mode.tool().to_string()] }
  }

  pub fn mode(&self) -> AnalysisMode {
    self.mode
  }

  pub fn program(&self) -> &str {
    &self.tokens[0]
  }

  pub fn args(&self) -> &[String] {
    &self.tokens[1..]
  }

  pub fn tokens(&self) -> &[String] {
    &self.tokens
  }

  pub fn into_tokens(self) -> Vec<String> {
    self.tokens
  }

  fn push(&mut self, token: impl Into<String>) {
    self.tokens.push(token.into());
  }

  fn push_flag_if(&mut self, enabled: bool, flag: &str) {
    if enabled {
      self.push(flag);
    }
  }

  // Empty values mean "not set"
  fn push_option(&mut self, flag: &str, value: &str) {
    if !value.is_empty() {
      self.push(flag);
      self.push(quote_option(value));
    }
  }

  fn push_image(&mut self, image: &ValidatedImage) {
    self.push(image.token());
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.tokens.join(" "))
  }
}

/// Assemble the command for `inputs`. Fails with `InvalidConfiguration` when
/// the primary images fit neither mode.
pub fn build(inputs: &ValidatedInputs, config: &SienaConfig, output_dir: &Path) -> Result<CommandSpec> {
  let mode = AnalysisMode::select(inputs.primary.len(), config.single_input_paired)?;
  let mut command = CommandSpec::new(mode);

  match (mode, inputs.primary.as_slice()) {
    (AnalysisMode::PairedComparison, [first, second]) => {
      command.push_image(first);
      command.push_image(second);
    }
    (AnalysisMode::PairedComparison, [only]) => {
      command.push_image(only);
      command.push_image(only);
    }
    (AnalysisMode::SingleScan, [only]) => command.push_image(only),
    (_, primary) => {
      return Err(SienaError::invalid_configuration(format!(
        "{} primary images do not fit {mode}",
        primary.len()
      )))
    }
  }

  push_shared_options(&mut command, config);

  match mode {
    AnalysisMode::PairedComparison => {
      command.push_flag_if(config.standard_space_masking, "-m");
      command.push_flag_if(config.ventricle_analysis, "-V");
      command.push_option("-S", &config.difference_options);
      if let Some(mask) = &inputs.ventricle_mask {
        command.push(VENTRICLE_MASK_FLAG);
        command.push_image(mask);
      }
    }
    AnalysisMode::SingleScan => {
      command.push_flag_if(config.regional, "-r");
      command.push_option("-S", &config.segmentation_options);
      if let Some(mask) = &inputs.lesion_mask {
        command.push(LESION_MASK_FLAG);
        command.push_image(mask);
      }
    }
  }

  command.push(OUTPUT_DIR_FLAG);
  command.push(output_dir.to_string_lossy());
  Ok(command)
}

fn push_shared_options(command: &mut CommandSpec, config: &SienaConfig) {
  command.push_flag_if(config.debug, "-d");
  command.push_flag_if(config.two_class_segmentation, "-2");
  command.push_flag_if(config.t2_weighted, "-t2");
  command.push_option("-B", &config.skull_extraction);
  command.push_option("-b", &config.lower_boundary);
  command.push_option("-t", &config.upper_boundary);
}
