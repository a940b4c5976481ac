//! One analysis request, start to finish: validate every supplied image,
//! assemble the command, launch it.

use bentley::Reporter;
use std::path::Path;

use crate::command::{build, AnalysisMode, CommandSpec, ValidatedInputs};
use crate::error::Result;
use crate::image::ImageProbe;
use crate::inputs::AnalysisRequest;
use crate::launcher::ProcessLauncher;
use crate::validator::Validator;

pub struct Pipeline<'a> {
  probe: &'a dyn ImageProbe,
  reporter: &'a dyn Reporter,
  launcher: &'a dyn ProcessLauncher,
}

impl<'a> Pipeline<'a> {
  pub fn new(
    probe: &'a dyn ImageProbe,
    reporter: &'a dyn Reporter,
    launcher: &'a dyn ProcessLauncher,
  ) -> Self {
    Self { probe, reporter, launcher }
  }

  /// Validate and build without launching
  pub fn prepare(&self, request: &AnalysisRequest, output_dir: &Path) -> Result<CommandSpec> {
    for name in request.unknown_inputs() {
      self.reporter.warn(&format!("Ignoring unknown input: {name}"));
    }

    let validator = Validator::new(self.probe, self.reporter);
    let selection = request.primary_selection()?;
    for input in &selection.ignored {
      self
        .reporter
        .warn(&format!("{} is not used alongside the other images and will be ignored", input.name));
    }

    let mut inputs = ValidatedInputs::default();
    for input in &selection.images {
      inputs.primary.push(validator.validate(input)?);
    }
    if let Some(mask) = request.ventricle_mask() {
      inputs.ventricle_mask = Some(validator.validate(&mask)?);
    }
    if let Some(mask) = request.lesion_mask() {
      inputs.lesion_mask = Some(validator.validate(&mask)?);
    }

    let command = build(&inputs, &request.config, output_dir)?;
    self.reporter.info(&format!("Getting FSL {} configuration...", command.mode()));
    self.warn_unused_masks(&inputs, command.mode());
    self.reporter.debug(&format!("Command: {command}"));
    Ok(command)
  }

  /// Run the request; returns the tool's exit status
  pub fn run(&self, request: &AnalysisRequest, output_dir: &Path) -> Result<i32> {
    let command = self.prepare(request, output_dir)?;
    self.reporter.info(&format!("Running FSL {}...", command.mode()));
    let code = self.launcher.execute(&command)?;
    if code != 0 {
      self.reporter.warn(&format!("{} exited with status {code}", command.program()));
    }
    Ok(code)
  }

  fn warn_unused_masks(&self, inputs: &ValidatedInputs, mode: AnalysisMode) {
    let unused = match mode {
      AnalysisMode::PairedComparison => inputs.lesion_mask.as_ref(),
      AnalysisMode::SingleScan => inputs.ventricle_mask.as_ref(),
    };
    if let Some(mask) = unused {
      self.reporter.warn(&format!("{} is not used by {mode} and will be ignored", mask.name()));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SienaConfig;
  use crate::error::SienaError;
  use crate::image::NiftiProbe;
  use crate::inputs::{FIRST_IMAGE, LESION_MASK, SECOND_IMAGE, SINGLE_IMAGE, VENTRICLE_MASK};
  use crate::launcher::MockProcessLauncher;
  use crate::testing::{write_garbage, write_nifti};
  use bentley::{Level, Recorder};
  use tempfile::TempDir;

  fn never_launched() -> MockProcessLauncher {
    let mut launcher = MockProcessLauncher::new();
    launcher.expect_execute().times(0);
    launcher
  }

  #[test]
  fn test_paired_run_launches_siena() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_nifti(temp_dir.path(), "t1 a.nii");
    let second = write_nifti(temp_dir.path(), "t1_b.nii");
    let request = AnalysisRequest::default()
      .with_input(FIRST_IMAGE, &first)
      .with_input(SECOND_IMAGE, &second);
    let output_dir = temp_dir.path().join("output");

    let expected_first = temp_dir.path().join("t1_a.nii").to_string_lossy().into_owned();
    let expected_second = second.to_string_lossy().into_owned();
    let expected_out = output_dir.to_string_lossy().into_owned();
    let mut launcher = MockProcessLauncher::new();
    launcher
      .expect_execute()
      .withf(move |command| {
        command.tokens()
          == [
            "siena".to_string(),
            expected_first.clone(),
            expected_second.clone(),
            "-o".to_string(),
            expected_out.clone(),
          ]
      })
      .times(1)
      .returning(|_| Ok(0));

    let recorder = Recorder::new();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);

    assert_eq!(pipeline.run(&request, &output_dir).unwrap(), 0);
    assert!(recorder.contains(Level::Info, "Running FSL SIENA..."));
  }

  #[test]
  fn test_tool_exit_status_is_propagated() {
    let temp_dir = TempDir::new().unwrap();
    let scan = write_nifti(temp_dir.path(), "t1.nii");
    let request = AnalysisRequest::default().with_input(SINGLE_IMAGE, &scan);

    let mut launcher = MockProcessLauncher::new();
    launcher.expect_execute().times(1).returning(|_| Ok(3));
    let recorder = Recorder::new();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);

    assert_eq!(pipeline.run(&request, Path::new("/out")).unwrap(), 3);
    assert!(recorder.contains(Level::Warn, "sienax exited with status 3"));
  }

  #[test]
  fn test_invalid_image_stops_before_launch() {
    let temp_dir = TempDir::new().unwrap();
    let good = write_nifti(temp_dir.path(), "t1.nii");
    let bad = write_garbage(temp_dir.path(), "t2.nii");
    let request =
      AnalysisRequest::default().with_input(FIRST_IMAGE, &good).with_input(SECOND_IMAGE, &bad);

    let launcher = never_launched();
    let recorder = Recorder::new();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);

    let err = pipeline.run(&request, Path::new("/out")).unwrap_err();
    assert!(matches!(err, SienaError::InvalidImageFormat { .. }));
  }

  #[test]
  fn test_invalid_mask_stops_before_launch() {
    let temp_dir = TempDir::new().unwrap();
    let scan = write_nifti(temp_dir.path(), "t1.nii");
    let mask = write_garbage(temp_dir.path(), "lesion.nii");
    let request =
      AnalysisRequest::default().with_input(SINGLE_IMAGE, &scan).with_input(LESION_MASK, &mask);

    let launcher = never_launched();
    let recorder = Recorder::new();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);

    assert!(matches!(
      pipeline.run(&request, Path::new("/out")),
      Err(SienaError::InvalidImageFormat { .. })
    ));
  }

  #[test]
  fn test_no_primary_image_stops_before_launch() {
    let launcher = never_launched();
    let recorder = Recorder::new();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);

    let err = pipeline.run(&AnalysisRequest::default(), Path::new("/out")).unwrap_err();
    assert!(matches!(err, SienaError::InvalidConfiguration { .. }));
  }

  #[test]
  fn test_single_scan_with_lesion_mask() {
    let temp_dir = TempDir::new().unwrap();
    let scan = write_nifti(temp_dir.path(), "t1.nii");
    let mask = write_nifti(temp_dir.path(), "lesion mask.nii");
    let request = AnalysisRequest::default()
      .with_config(SienaConfig { t2_weighted: true, ..Default::default() })
      .with_input(SINGLE_IMAGE, &scan)
      .with_input(LESION_MASK, &mask);

    let recorder = Recorder::new();
    let launcher = never_launched();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);
    let command = pipeline.prepare(&request, Path::new("/out")).unwrap();

    let tokens = command.tokens();
    assert_eq!(tokens[0], "sienax");
    let lm = tokens.iter().position(|t| t == "-lm").unwrap();
    let t2 = tokens.iter().position(|t| t == "-t2").unwrap();
    assert!(lm > t2);
    assert_eq!(tokens[lm + 1], temp_dir.path().join("lesion_mask.nii").to_string_lossy());
  }

  #[test]
  fn test_mask_for_other_mode_is_validated_and_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let scan = write_nifti(temp_dir.path(), "t1.nii");
    let mask = write_nifti(temp_dir.path(), "vent.nii");
    let request =
      AnalysisRequest::default().with_input(SINGLE_IMAGE, &scan).with_input(VENTRICLE_MASK, &mask);

    let recorder = Recorder::new();
    let launcher = never_launched();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);
    let command = pipeline.prepare(&request, Path::new("/out")).unwrap();

    assert!(!command.tokens().iter().any(|t| t == "-v"));
    assert!(recorder.contains(Level::Info, "Valid NIfTI file provided ventricle_mask"));
    assert!(recorder.contains(Level::Warn, "ventricle_mask is not used by SIENAX"));
  }

  #[test]
  fn test_single_input_paired_mode() {
    let temp_dir = TempDir::new().unwrap();
    let scan = write_nifti(temp_dir.path(), "t1.nii");
    let request = AnalysisRequest::default()
      .with_config(SienaConfig { single_input_paired: true, ..Default::default() })
      .with_input(SINGLE_IMAGE, &scan);

    let recorder = Recorder::new();
    let launcher = never_launched();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);
    let command = pipeline.prepare(&request, Path::new("/out")).unwrap();

    let path = scan.to_string_lossy();
    assert_eq!(command.program(), "siena");
    assert_eq!(command.args()[0], path);
    assert_eq!(command.args()[1], path);
  }

  #[test]
  fn test_all_three_images_run_the_pair() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_nifti(temp_dir.path(), "a.nii");
    let second = write_nifti(temp_dir.path(), "b.nii");
    let single = write_nifti(temp_dir.path(), "c.nii");
    let request = AnalysisRequest::default()
      .with_input(FIRST_IMAGE, &first)
      .with_input(SECOND_IMAGE, &second)
      .with_input(SINGLE_IMAGE, &single);

    let recorder = Recorder::new();
    let launcher = never_launched();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);
    let command = pipeline.prepare(&request, Path::new("/out")).unwrap();

    assert_eq!(command.program(), "siena");
    assert_eq!(command.args()[0], first.to_string_lossy());
    assert_eq!(command.args()[1], second.to_string_lossy());
    assert!(!command.tokens().iter().any(|t| *t == single.to_string_lossy()));
    assert!(recorder.contains(Level::Warn, "nifti is not used"));
  }

  #[test]
  fn test_first_image_with_single_image_runs_sienax() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_nifti(temp_dir.path(), "a.nii");
    let single = write_nifti(temp_dir.path(), "c.nii");
    let request =
      AnalysisRequest::default().with_input(FIRST_IMAGE, &first).with_input(SINGLE_IMAGE, &single);

    let recorder = Recorder::new();
    let launcher = never_launched();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);
    let command = pipeline.prepare(&request, Path::new("/out")).unwrap();

    let single_token = single.to_string_lossy().into_owned();
    assert_eq!(command.tokens(), ["sienax".to_string(), single_token, "-o".to_string(), "/out".to_string()]);
    assert!(recorder.contains(Level::Warn, "nifti_1 is not used"));
  }

  #[test]
  fn test_first_image_alone_stops_before_launch() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_nifti(temp_dir.path(), "a.nii");
    let request = AnalysisRequest::default().with_input(FIRST_IMAGE, &first);

    let launcher = never_launched();
    let recorder = Recorder::new();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);

    assert!(matches!(
      pipeline.run(&request, Path::new("/out")),
      Err(SienaError::InvalidConfiguration { .. })
    ));
  }

  #[test]
  fn test_sanitized_copy_never_replaces_other_input() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_nifti(temp_dir.path(), "a b.nii");
    let second = temp_dir.path().join("a_b.nii");
    let mut second_bytes = crate::testing::nifti_bytes();
    let last = second_bytes.len() - 1;
    second_bytes[last] = 42;
    std::fs::write(&second, &second_bytes).unwrap();
    let request =
      AnalysisRequest::default().with_input(FIRST_IMAGE, &first).with_input(SECOND_IMAGE, &second);

    let launcher = never_launched();
    let recorder = Recorder::new();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);

    assert!(matches!(
      pipeline.run(&request, Path::new("/out")),
      Err(SienaError::Filesystem { .. })
    ));
    assert_eq!(std::fs::read(&second).unwrap(), second_bytes);
  }

  #[test]
  fn test_unknown_inputs_are_reported() {
    let temp_dir = TempDir::new().unwrap();
    let scan = write_nifti(temp_dir.path(), "t1.nii");
    let request = AnalysisRequest::default()
      .with_input(SINGLE_IMAGE, &scan)
      .with_input("T2_IMAGE", temp_dir.path().join("missing.nii"));

    let recorder = Recorder::new();
    let launcher = never_launched();
    let pipeline = Pipeline::new(&NiftiProbe, &recorder, &launcher);
    pipeline.prepare(&request, Path::new("/out")).unwrap();

    assert!(recorder.contains(Level::Warn, "Ignoring unknown input: T2_IMAGE"));
  }
}
