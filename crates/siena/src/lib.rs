//! SIENA/SIENAX launcher
//!
//! Validates NIfTI inputs, assembles the FSL command line for either a paired
//! comparison (`siena`) or a single-scan analysis (`sienax`) and runs it.
//! Logging, image decoding and process launch are injected so the pipeline can
//! be exercised without FSL installed.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod image;
pub mod inputs;
pub mod launcher;
pub mod pipeline;
pub mod validator;

#[cfg(test)]
mod testing;

pub use command::{build, AnalysisMode, CommandSpec, ValidatedInputs};
pub use config::SienaConfig;
pub use error::{Result, SienaError};
pub use inputs::{AnalysisRequest, ImagingInput};
pub use pipeline::Pipeline;
pub use validator::{ValidatedImage, Validator};
