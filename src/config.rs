// SPDX-License-Identifier: MPL-2.0

//! Run configuration: filter method, its parameters and the file paths.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Filter applied to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Forward and inverse transform with an identity kernel.
    Nop,
    /// Gaussian blur.
    #[default]
    Gaussian,
    /// False color magnitude spectrum.
    Spectrum,
    /// Halve the image size.
    Downscale2x,
    /// Double the image size.
    Upscale2x,
}

impl Method {
    /// Every method, in command line order.
    pub const ALL: [Method; 5] = [
        Method::Nop,
        Method::Gaussian,
        Method::Spectrum,
        Method::Downscale2x,
        Method::Upscale2x,
    ];

    /// Name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Nop => "nop",
            Method::Gaussian => "gaussian",
            Method::Spectrum => "spectrum",
            Method::Downscale2x => "downscale2x",
            Method::Upscale2x => "upscale2x",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| Error::Configuration(format!("unknown method: {s}")))
    }
}

/// Parameters of the filter itself, independent of where the image comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    /// Filter to apply.
    pub method: Method,
    /// Standard deviation of the Gaussian kernel, in pixels.
    pub weight: f64,
    /// Maximum number of mirrored pixels added on each side.
    pub extend: u32,
    /// Move zero frequency to the image center in the spectrum view.
    pub center_spectrum: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            method: Method::default(),
            weight: 10.0,
            extend: 64,
            center_spectrum: false,
        }
    }
}

impl FilterOptions {
    /// Reject parameters no kernel can be built from.
    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(Error::Configuration(format!(
                "invalid value for 'weight': {}",
                self.weight
            )));
        }
        Ok(())
    }
}

/// A complete run: read `input`, filter it, write `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Image to read.
    pub input: PathBuf,
    /// Image to write, the format follows the extension.
    pub output: PathBuf,
    /// Filter parameters.
    pub filter: FilterOptions,
}

impl Options {
    /// Check the options before any file is touched.
    pub fn validate(&self) -> Result<()> {
        self.filter.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
        assert_eq!("downscale2x".parse::<Method>().unwrap(), Method::Downscale2x);
    }

    #[test]
    fn unknown_method_is_a_configuration_error() {
        let err = "sharpen".parse::<Method>().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert_eq!(err.to_string(), "invalid configuration: unknown method: sharpen");
    }

    #[test]
    fn defaults() {
        let options = FilterOptions::default();
        assert_eq!(options.method, Method::Gaussian);
        assert_eq!(options.weight, 10.0);
        assert_eq!(options.extend, 64);
        assert!(!options.center_spectrum);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn weight_must_be_positive_and_finite() {
        for weight in [0.0, -2.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let options = FilterOptions {
                weight,
                ..Default::default()
            };
            assert!(matches!(options.validate(), Err(Error::Configuration(_))));
        }
    }
}
