// SPDX-License-Identifier: MPL-2.0

//! Complex plane buffers holding one color channel.

use rustfft::num_complex::Complex;

use crate::error::{Error, Result};

/// Allocate a vector of `len` copies of `value`,
/// reporting an allocation failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(what: &'static str, len: usize, value: T) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| Error::Allocation { what, len })?;
    buffer.resize(len, value);
    Ok(buffer)
}

/// Number of samples of a `width` x `height` buffer, with overflow reported
/// as an allocation failure.
pub(crate) fn sample_count(what: &'static str, width: usize, height: usize) -> Result<usize> {
    width.checked_mul(height).ok_or(Error::Allocation {
        what,
        len: usize::MAX,
    })
}

/// A row-major buffer of complex samples with fixed dimensions.
///
/// Depending on the pipeline stage the samples are either linear light
/// intensities or the (unshifted) 2D Fourier coefficients of a channel.
/// The length of the buffer always equals `width * height`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<Complex<f64>>,
}

impl Plane {
    /// Allocate a plane filled with zeros.
    pub fn zeroed(width: usize, height: usize) -> Result<Self> {
        let len = sample_count("plane", width, height)?;
        let data = try_filled("plane", len, Complex::default())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap an existing buffer.
    ///
    /// Panics if the buffer length is not `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<Complex<f64>>) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "plane buffer does not match its dimensions"
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a plane from real values, the imaginary parts being zero.
    pub fn from_real(width: usize, height: usize, values: &[f64]) -> Self {
        let data = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
        Self::from_vec(width, height, data)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of samples, `width * height`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the plane has no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample at column `x` and row `y`.
    pub fn get(&self, x: usize, y: usize) -> Complex<f64> {
        self.data[y * self.width + x]
    }

    /// Mutable sample at column `x` and row `y`.
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut Complex<f64> {
        &mut self.data[y * self.width + x]
    }

    /// Samples in row major order.
    pub fn as_slice(&self) -> &[Complex<f64>] {
        &self.data
    }

    /// Mutable samples in row major order.
    pub fn as_mut_slice(&mut self) -> &mut [Complex<f64>] {
        &mut self.data
    }

    /// Iterate over rows of the plane.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, Complex<f64>> {
        self.data.chunks_exact(self.width.max(1))
    }

    /// Iterate mutably over rows of the plane.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, Complex<f64>> {
        self.data.chunks_exact_mut(self.width.max(1))
    }

    /// Pointwise product with another plane of the same dimensions,
    /// which is how a kernel spectrum is applied to a channel spectrum.
    pub fn multiply(&mut self, other: &Plane) {
        assert_eq!(
            self.dimensions(),
            other.dimensions(),
            "cannot multiply planes of different sizes"
        );
        for (a, k) in self.data.iter_mut().zip(&other.data) {
            *a *= k;
        }
    }

    /// Sum of the real parts of all samples.
    pub fn real_sum(&self) -> f64 {
        self.data.iter().map(|c| c.re).sum()
    }
}
