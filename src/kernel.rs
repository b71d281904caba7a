// SPDX-License-Identifier: MPL-2.0

//! Convolution kernels sampled on the transform grid.
//!
//! A kernel is synthesized in the space domain at wrapped offsets from the
//! origin (offsets beyond half the size fold to negative values, matching the
//! unshifted layout of the FFT), then normalized so that its real values sum
//! to `1 / (width * height)`. After the forward transform the kernel therefore
//! has unit DC gain and also carries the normalization of the unnormalized
//! forward/inverse transform pair.

use crate::error::{Error, Result};
use crate::plane::Plane;
use crate::slice::Plan;

/// Filter family and parameters of a kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// Unit impulse, the filter that changes nothing.
    Identity,
    /// Gaussian blur.
    Gaussian {
        /// Standard deviation in pixels.
        weight: f64,
    },
    /// Mitchell-Netravali cubic (B = C = 1/3).
    Mitchell {
        /// Stretch factor, the support is `[-2 scale, 2 scale]`.
        scale: f64,
    },
    /// Separable Lanczos windowed sinc.
    Lanczos {
        /// Factor applied to pixel offsets before evaluation.
        scale: f64,
        /// Radius in pixels, samples further away are zero.
        a: u32,
    },
}

impl Kernel {
    /// Reject parameters for which synthesis is undefined.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::Configuration(format!(
                    "invalid value for '{name}': {value}"
                )))
            }
        };
        match *self {
            Kernel::Identity => Ok(()),
            Kernel::Gaussian { weight } => positive("weight", weight),
            Kernel::Mitchell { scale } => positive("scale", scale),
            Kernel::Lanczos { scale, a } => {
                positive("scale", scale)?;
                if a == 0 {
                    return Err(Error::Configuration(
                        "invalid value for 'a': 0".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Sample the normalized kernel on a `width` x `height` grid.
    pub fn synthesize(&self, width: usize, height: usize) -> Result<Plane> {
        self.validate()?;
        let mut plane = Plane::zeroed(width, height)?;
        if plane.is_empty() {
            return Ok(plane);
        }
        match *self {
            Kernel::Identity => {
                *plane.get_mut(0, 0) = (1.0 / (width * height) as f64).into();
                return Ok(plane);
            }
            // Unscaled, normalize supplies the 1 / (2 pi weight^2) factor.
            // Tiny weights give an impulse, huge ones a flat kernel.
            Kernel::Gaussian { weight } => {
                fill(&mut plane, |dx, dy| {
                    (-0.5 * ((dx / weight).powi(2) + (dy / weight).powi(2))).exp()
                });
            }
            Kernel::Mitchell { scale } => {
                fill(&mut plane, |dx, dy| mitchell(dx.hypot(dy) / scale));
            }
            Kernel::Lanczos { scale, a } => {
                let a = f64::from(a);
                fill(&mut plane, |dx, dy| {
                    if dx.abs() > a || dy.abs() > a {
                        0.0
                    } else {
                        lanczos(dx * scale, a) * lanczos(dy * scale, a)
                    }
                });
            }
        }
        normalize(&mut plane)?;
        Ok(plane)
    }

    /// Synthesize the kernel and run its forward transform,
    /// ready to be multiplied with channel spectra of the same size.
    pub fn spectrum(&self, width: usize, height: usize) -> Result<Plane> {
        let mut plane = self.synthesize(width, height)?;
        Plan::forward(width, height).process(plane.as_mut_slice())?;
        tracing::debug!(kernel = ?self, width, height, "kernel spectrum ready");
        Ok(plane)
    }
}

/// Signed offset of index `v` on an axis of length `size`.
fn map_axis(v: usize, size: usize) -> f64 {
    if v < size / 2 {
        v as f64
    } else {
        v as f64 - size as f64
    }
}

fn fill(plane: &mut Plane, f: impl Fn(f64, f64) -> f64) {
    let (width, height) = plane.dimensions();
    for (y, row) in plane.rows_mut().enumerate() {
        let dy = map_axis(y, height);
        for (x, value) in row.iter_mut().enumerate() {
            *value = f(map_axis(x, width), dy).into();
        }
    }
}

/// Divide every sample by `width * height * sum`, dropping imaginary parts.
fn normalize(plane: &mut Plane) -> Result<()> {
    let sum = plane.real_sum();
    if !(sum.is_finite() && sum > 0.0) {
        return Err(Error::Configuration(format!(
            "kernel cannot be normalized, sum of samples is {sum}"
        )));
    }
    let scale = plane.len() as f64 * sum;
    for value in plane.as_mut_slice() {
        *value = (value.re / scale).into();
    }
    Ok(())
}

/// Mitchell-Netravali kernel with B=C=1/3.
/// Support is [-2, 2].
pub fn mitchell(x: f64) -> f64 {
    const B: f64 = 1.0 / 3.0;
    const C: f64 = 1.0 / 3.0;
    let x = x.abs();
    if x < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * x * x * x
            + (-18.0 + 12.0 * B + 6.0 * C) * x * x
            + (6.0 - 2.0 * B))
            / 6.0
    } else if x < 2.0 {
        ((-B - 6.0 * C) * x * x * x
            + (6.0 * B + 30.0 * C) * x * x
            + (-12.0 * B - 48.0 * C) * x
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

/// One axis of the Lanczos kernel: `sin(x)/x * sin(x/a)/(x/a)`, 1 at the origin.
pub fn lanczos(x: f64, a: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    let xa = x / a;
    (x.sin() / x) * (xa.sin() / xa)
}
