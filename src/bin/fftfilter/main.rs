// SPDX-License-Identifier: MPL-2.0

//! fftfilter - frequency-domain image filters.
//!
//! Pipeline: input -> mirrored extension -> FFT per channel -> kernel / resample
//! -> inverse FFT -> crop -> output.

mod args;

use std::process::ExitCode;

use anyhow::Context;
use args::Args;
use clap::{CommandFactory, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fftfilter::{Error, Options};

/// Log to stderr, filtered by `RUST_LOG` or else `base_level`.
fn setup_logging(base_level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(base_level))
        .with_context(|| format!("invalid log filter: {base_level}"))?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .context("logger initialization failed")
}

fn run(options: &Options) -> anyhow::Result<()> {
    fftfilter::run(options).with_context(|| {
        format!(
            "{} => {}",
            options.input.display(),
            options.output.display()
        )
    })
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = setup_logging(&args.log_level) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }

    let options = args.to_options();
    if let Err(err) = options.validate() {
        eprintln!("argument error: {err}");
        eprintln!("{}", Args::command().render_help());
        return ExitCode::FAILURE;
    }

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(Error::Configuration(_)) = err.downcast_ref::<Error>() {
                eprintln!("argument error: {err:#}");
                eprintln!("{}", Args::command().render_help());
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
