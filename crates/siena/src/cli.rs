use bentley::Reporter;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::image::NiftiProbe;
use crate::inputs::AnalysisRequest;
use crate::launcher::{DryRunLauncher, ProcessLauncher, SystemLauncher};
use crate::pipeline::Pipeline;

pub const DEFAULT_REQUEST: &str = "config.json";

/// fsl-siena - brain volume change analysis
///
/// Validates NIfTI inputs, then runs FSL SIENA (two scans) or SIENAX (one scan).
#[derive(Parser, Debug)]
#[command(name = "fsl-siena")]
#[command(about = "Validates NIfTI inputs and runs FSL SIENA or SIENAX")]
#[command(version)]
pub struct Cli {
  /// Request file with analysis options and input locations [default: config.json if present]
  #[arg(short, long, env = "SIENA_REQUEST")]
  pub request: Option<PathBuf>,

  /// Add or replace an input, e.g. --input NIFTI=/data/t1.nii.gz
  #[arg(short, long = "input", value_name = "NAME=PATH", value_parser = parse_input)]
  pub inputs: Vec<(String, PathBuf)>,

  /// Directory the tool writes its results to
  #[arg(short, long, default_value = "output", env = "SIENA_OUTPUT_DIR")]
  pub output_dir: PathBuf,

  /// Print the command without running it
  #[arg(long)]
  pub dry_run: bool,

  /// Show debug output
  #[arg(short, long)]
  pub verbose: bool,

  /// Log output style
  #[arg(long, value_enum, default_value = "pretty")]
  pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum LogFormat {
  /// Colored, prefixed lines on stderr
  #[default]
  Pretty,
  /// `tracing` events
  Structured,
}

fn parse_input(value: &str) -> std::result::Result<(String, PathBuf), String> {
  match value.split_once('=') {
    Some((name, path)) if !name.is_empty() && !path.is_empty() => {
      Ok((name.to_string(), PathBuf::from(path)))
    }
    _ => Err(format!("expected NAME=PATH, got '{value}'")),
  }
}

impl Cli {
  /// The request file plus any `--input` overrides
  pub fn load_request(&self) -> Result<AnalysisRequest> {
    let mut request = match &self.request {
      Some(path) => AnalysisRequest::load_from_file(path)?,
      None if Path::new(DEFAULT_REQUEST).exists() => AnalysisRequest::load_from_file(DEFAULT_REQUEST)?,
      None => AnalysisRequest::default(),
    };
    for (name, path) in &self.inputs {
      request = request.with_input(name, path);
    }
    Ok(request)
  }
}

/// Load the request and run it with the real decoder; returns the exit status
pub fn run(cli: &Cli, reporter: &dyn Reporter) -> Result<i32> {
  let request = cli.load_request()?;
  let launcher: &dyn ProcessLauncher = if cli.dry_run { &DryRunLauncher } else { &SystemLauncher };
  Pipeline::new(&NiftiProbe, reporter, launcher).run(&request, &cli.output_dir)
}
