use bentley::{Console, Reporter, Structured};
use clap::Parser;
use siena::cli::{self, Cli, LogFormat};
use std::process;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

fn main() {
  let cli = Cli::parse();

  let reporter: Box<dyn Reporter> = match cli.log_format {
    LogFormat::Pretty => Box::new(Console::new(cli.verbose)),
    LogFormat::Structured => {
      init_tracing(cli.verbose);
      Box::new(Structured)
    }
  };

  if cli.log_format == LogFormat::Pretty {
    bentley::announce("FSL: SIENA/SIENAX");
  }
  reporter.info("Starting FSL: SIENA/SIENAX...");

  match cli::run(&cli, reporter.as_ref()) {
    Ok(code) => process::exit(code),
    Err(e) => {
      reporter.error(&e.to_string());
      reporter.error("Siena/SienaX will not run. Exiting...");
      process::exit(1);
    }
  }
}

#[cfg(not(tarpaulin_include))]
fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
}
