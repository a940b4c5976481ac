//! Analysis options
//!
//! The closed set of options the external tools understand. Keys mirror the
//! job file written by the analysis platform; anything outside the set is
//! rejected at load time so the command builder only ever sees typed fields.

use serde::{Deserialize, Serialize};

/// Options shared by both analysis modes plus the mode-specific extras
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SienaConfig {
  /// Keep intermediate files and print debug output (`-d`)
  #[serde(rename = "DEBUG")]
  pub debug: bool,
  /// Two-class segmentation, no grey/white separation (`-2`)
  #[serde(rename = "SEG")]
  pub two_class_segmentation: bool,
  /// Input is T2-weighted (`-t2`)
  #[serde(rename = "T2")]
  pub t2_weighted: bool,
  /// Brain-extraction options (`-B`)
  #[serde(rename = "BET")]
  pub skull_extraction: String,
  /// Ignore voxels below this z coordinate, in mm (`-b`)
  #[serde(rename = "BOTTOM")]
  pub lower_boundary: String,
  /// Ignore voxels above this z coordinate, in mm (`-t`)
  #[serde(rename = "TOP")]
  pub upper_boundary: String,

  /// Regional peripheral grey and ventricular CSF volumes (`-r`, single scan)
  #[serde(rename = "REGIONAL")]
  pub regional: bool,
  /// Options passed to the segmentation tool (`-S`, single scan)
  #[serde(rename = "S_FAST")]
  pub segmentation_options: String,

  /// Standard-space masking of the brain (`-m`, paired)
  #[serde(rename = "SS_BET")]
  pub standard_space_masking: bool,
  /// Ventricular analysis (`-V`, paired)
  #[serde(rename = "VENT")]
  pub ventricle_analysis: bool,
  /// Options passed to the difference-registration step (`-S`, paired)
  #[serde(rename = "S_DIFF")]
  pub difference_options: String,

  /// Run the paired tool against a single image compared with itself
  #[serde(rename = "SINGLE_INPUT")]
  pub single_input_paired: bool,
}

/// Wraps `value` in literal double quotes unless it already starts with one,
/// so multi-word option strings survive as a single downstream argument.
pub fn quote_option(value: &str) -> String {
  if value.starts_with('"') {
    value.to_string()
  } else {
    format!("\"{value}\"")
  }
}
