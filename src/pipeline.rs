// SPDX-License-Identifier: MPL-2.0

//! Filter pipeline: extension, transforms, kernel and resampling per channel.
//!
//! A [`Pipeline`] is built once from the selected method. It describes which
//! kernel is multiplied with the channel spectra, how the spectrum is
//! resized, and whether the result is transformed back or visualized.
//! The same driver then runs every method:
//!
//! 1. the image is extended into three planes while, in parallel,
//!    the kernel is synthesized and transformed;
//! 2. the three channels are transformed, filtered and resized in parallel;
//! 3. the channels are visualized or cropped back into an image.

use std::time::Instant;

use rustfft::num_complex::Complex;
use tracing::{debug, info};

use crate::codec::Image;
use crate::config::{FilterOptions, Method, Options};
use crate::error::{Error, Result};
use crate::extend::{crop, extend, extended_size, max_extension};
use crate::kernel::Kernel;
use crate::plane::Plane;
use crate::resample::{downsample_2x, upsample_2x};
use crate::slice::{self, Plan};
use crate::spectrum;

const MITCHELL_SCALE: f64 = 2.0;
const LANCZOS_SCALE: f64 = 2.0;
const LANCZOS_RADIUS: u32 = 10;

/// How the spectrum size changes between the forward and the inverse transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resize {
    /// Same size.
    Keep,
    /// Half size, keeping the lowest frequencies.
    Half,
    /// Double size, zero filling the new frequencies.
    Double,
}

impl Resize {
    /// Size of the output for an input of `width` x `height`.
    pub fn output_size(self, width: usize, height: usize) -> (usize, usize) {
        match self {
            Resize::Keep => (width, height),
            Resize::Half => (width / 2, height / 2),
            Resize::Double => (width * 2, height * 2),
        }
    }

    fn apply(self, plane: Plane) -> Result<Plane> {
        match self {
            Resize::Keep => Ok(plane),
            Resize::Half => downsample_2x(&plane),
            Resize::Double => upsample_2x(&plane),
        }
    }
}

/// What becomes of the filtered channel spectra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Transform back to the space domain.
    Inverse,
    /// Render the spectrum itself, optionally centered on zero frequency.
    Visualize {
        /// Move zero frequency to the image center.
        center: bool,
    },
}

/// Everything a run needs to know about the selected method.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    /// Method the pipeline was built from.
    pub method: Method,
    /// Kernel multiplied with the channel spectra, if any.
    pub kernel: Option<Kernel>,
    /// Spectrum size change.
    pub resize: Resize,
    /// Fate of the filtered spectra.
    pub output: Output,
    /// Configured maximum extension, in pixels per side.
    pub extend: usize,
}

impl Pipeline {
    /// Build the pipeline of a method, rejecting invalid parameters.
    pub fn new(options: &FilterOptions) -> Result<Self> {
        options.validate()?;
        let (kernel, resize, output) = match options.method {
            Method::Nop => (Some(Kernel::Identity), Resize::Keep, Output::Inverse),
            Method::Gaussian => (
                Some(Kernel::Gaussian {
                    weight: options.weight,
                }),
                Resize::Keep,
                Output::Inverse,
            ),
            Method::Spectrum => (
                None,
                Resize::Keep,
                Output::Visualize {
                    center: options.center_spectrum,
                },
            ),
            Method::Downscale2x => (
                Some(Kernel::Mitchell {
                    scale: MITCHELL_SCALE,
                }),
                Resize::Half,
                Output::Inverse,
            ),
            // The Lanczos window is applied on the original size spectrum,
            // before the new high frequencies are introduced.
            Method::Upscale2x => (
                Some(Kernel::Lanczos {
                    scale: LANCZOS_SCALE,
                    a: LANCZOS_RADIUS,
                }),
                Resize::Double,
                Output::Inverse,
            ),
        };
        if let Some(kernel) = &kernel {
            kernel.validate()?;
        }
        Ok(Self {
            method: options.method,
            kernel,
            resize,
            output,
            extend: options.extend as usize,
        })
    }

    /// Number of mirrored pixels added on each side of a `width` x `height` image.
    pub fn extension(&self, width: usize, height: usize) -> Result<usize> {
        let unsupported = |reason| Error::UnsupportedDimensions {
            method: self.method.as_str(),
            width,
            height,
            reason,
        };
        if width == 0 || height == 0 {
            return Err(unsupported("the image is empty"));
        }
        if self.resize != Resize::Keep && (width % 2 != 0 || height % 2 != 0) {
            return Err(unsupported("resampling needs even dimensions"));
        }
        let amount = match self.output {
            Output::Visualize { .. } => 0,
            Output::Inverse => self.extend.min(max_extension(width, height)),
        };
        // Keep the halved extension aligned with the halved image.
        Ok(match self.resize {
            Resize::Half => amount & !1,
            Resize::Keep | Resize::Double => amount,
        })
    }

    /// Filter an image.
    pub fn apply(&self, image: &Image) -> Result<Image> {
        let (width, height) = image.dimensions();
        let amount = self.extension(width, height)?;
        let (w, h) = extended_size(width, height, amount);
        // Three channels and the kernel, plus the decoded image.
        let estimated_mib = (w * h * std::mem::size_of::<Complex<f64>>() * 4 + width * height * 4) >> 20;
        info!(
            width,
            height,
            extension = amount,
            transform_width = w,
            transform_height = h,
            estimated_mib,
            "filtering"
        );

        let begin = Instant::now();
        let (planes, kernel_spectrum) = rayon::join(
            || extend(image, amount),
            || self.kernel.map(|kernel| kernel.spectrum(w, h)).transpose(),
        );
        let [r, g, b] = planes?;
        let kernel_spectrum = kernel_spectrum?;
        debug!(elapsed_ms = begin.elapsed().as_millis(), "channels and kernel ready");

        let kernel = kernel_spectrum.as_ref();
        let (r, (g, b)) = rayon::join(
            || self.channel(r, kernel),
            || rayon::join(|| self.channel(g, kernel), || self.channel(b, kernel)),
        );
        drop(kernel_spectrum);
        let mut planes = [r?, g?, b?];
        debug!(elapsed_ms = begin.elapsed().as_millis(), "channels filtered");

        if let Output::Visualize { center } = self.output {
            spectrum::visualize(&mut planes, center)?;
        }

        let (out_width, out_height) = self.resize.output_size(width, height);
        let out_amount = match self.resize {
            Resize::Keep => amount,
            Resize::Half => amount / 2,
            Resize::Double => amount * 2,
        };
        let mut output = Image::new(out_width, out_height, image.gamma());
        crop(out_amount, &planes, &mut output);
        Ok(output)
    }

    /// Forward transform, kernel multiply, resize and inverse transform of one channel.
    fn channel(&self, mut plane: Plane, kernel: Option<&Plane>) -> Result<Plane> {
        let (w, h) = plane.dimensions();
        Plan::forward(w, h).process(plane.as_mut_slice())?;
        if let Some(kernel) = kernel {
            plane.multiply(kernel);
        }
        let mut plane = self.resize.apply(plane)?;
        if self.output == Output::Inverse {
            let (w, h) = plane.dimensions();
            Plan::inverse(w, h).process(plane.as_mut_slice())?;
        }
        Ok(plane)
    }
}

/// Read the input image, filter it and write the output image.
///
/// Nothing is written unless the whole computation succeeds.
pub fn run(options: &Options) -> Result<()> {
    let pipeline = Pipeline::new(&options.filter)?;
    info!(
        input = %options.input.display(),
        output = %options.output.display(),
        method = %pipeline.method,
        "starting"
    );

    let begin = Instant::now();
    let input = Image::open(&options.input)?;
    info!(elapsed_ms = begin.elapsed().as_millis(), "read");

    let begin = Instant::now();
    let filtered = pipeline.apply(&input);
    drop(input);
    slice::cleanup();
    let output = filtered?;
    info!(elapsed_ms = begin.elapsed().as_millis(), "compute");

    let begin = Instant::now();
    output.write(&options.output)?;
    info!(elapsed_ms = begin.elapsed().as_millis(), "save");
    Ok(())
}
