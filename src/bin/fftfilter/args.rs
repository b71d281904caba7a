// SPDX-License-Identifier: MPL-2.0

//! Command-line argument definitions and conversion to run options.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use fftfilter::{FilterOptions, Method, Options};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// Transform and transform back, leaving the image unchanged
    #[value(name = "nop")]
    Nop,
    /// Gaussian blur, see --weight
    #[value(name = "gaussian")]
    Gaussian,
    /// False color view of the magnitude spectrum
    #[value(name = "spectrum")]
    Spectrum,
    /// Halve the image size (Mitchell anti-aliasing)
    #[value(name = "downscale2x")]
    Downscale2x,
    /// Double the image size (Lanczos window)
    #[value(name = "upscale2x")]
    Upscale2x,
}

impl MethodArg {
    pub fn to_method(self) -> Method {
        match self {
            MethodArg::Nop => Method::Nop,
            MethodArg::Gaussian => Method::Gaussian,
            MethodArg::Spectrum => Method::Spectrum,
            MethodArg::Downscale2x => Method::Downscale2x,
            MethodArg::Upscale2x => Method::Upscale2x,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fftfilter", version)]
#[command(about = "Frequency-domain image filters: blur, spectrum view and 2x resampling")]
pub struct Args {
    /// Input image
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output image, the format follows the extension
    #[arg(short, long)]
    pub output: PathBuf,

    /// Standard deviation of the gaussian kernel, in pixels
    #[arg(short, long, default_value_t = 10.0)]
    pub weight: f64,

    /// Maximum number of mirrored pixels added on each side
    #[arg(short = 'x', long, default_value_t = 64)]
    pub extend: u32,

    /// Filter to apply
    #[arg(short, long, value_enum, default_value_t = MethodArg::Gaussian)]
    pub method: MethodArg,

    /// Put zero frequency in the middle of the spectrum view
    #[arg(long)]
    pub center_spectrum: bool,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn to_options(&self) -> Options {
        Options {
            input: self.input.clone(),
            output: self.output.clone(),
            filter: FilterOptions {
                method: self.method.to_method(),
                weight: self.weight,
                extend: self.extend,
                center_spectrum: self.center_spectrum,
            },
        }
    }
}
