// SPDX-License-Identifier: MPL-2.0

//! Fourier transform for 2D data such as images, on mutable slices.
//!
//! A [`Plan`] is bound to one buffer size and one direction.
//! Each plan owns handles to the 1D row and column transforms,
//! which are taken from a process-wide cache of rustfft plans.
//! Call [`cleanup`] once every plan has been dropped to release that cache.

use std::sync::Arc;

use parking_lot::Mutex;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftDirection, FftPlanner};

use crate::error::Result;
use crate::plane::{sample_count, try_filled};

static PLANNER: Mutex<Option<FftPlanner<f64>>> = parking_lot::const_mutex(None);

/// Fetch (or create and cache) the 1D transform of a given length and direction.
fn cached_fft(len: usize, direction: FftDirection) -> Arc<dyn Fft<f64>> {
    let mut planner = PLANNER.lock();
    let planner = planner.get_or_insert_with(|| {
        tracing::debug!("creating fft planner");
        FftPlanner::new()
    });
    planner.plan_fft(len, direction)
}

/// Release the planner and every 1D transform it cached.
///
/// Plans that are still alive keep their own handles,
/// so this is only useful once all plans of a run are dropped.
pub fn cleanup() {
    if PLANNER.lock().take().is_some() {
        tracing::debug!("released cached fft plans");
    }
}

/// A 2D transform of a fixed size and direction.
///
/// The transformation is not normalized.
/// A forward transform followed by an inverse transform multiplies
/// every sample by `width * height`.
pub struct Plan {
    width: usize,
    height: usize,
    rows: Arc<dyn Fft<f64>>,
    columns: Arc<dyn Fft<f64>>,
}

impl Plan {
    /// Plan a 2D transform of buffers with `width` columns and `height` rows.
    pub fn new(width: usize, height: usize, direction: FftDirection) -> Self {
        Self {
            width,
            height,
            rows: cached_fft(width, direction),
            columns: cached_fft(height, direction),
        }
    }

    /// Plan a forward transform.
    pub fn forward(width: usize, height: usize) -> Self {
        Self::new(width, height, FftDirection::Forward)
    }

    /// Plan an inverse transform.
    pub fn inverse(width: usize, height: usize) -> Self {
        Self::new(width, height, FftDirection::Inverse)
    }

    /// Transform a row major buffer in place.
    ///
    /// Rows are transformed first, then the buffer is transposed so that
    /// the columns can be processed as contiguous slices,
    /// and finally transposed back so that the output stays in row major order.
    ///
    /// Remark: two allocations the size of the buffer are performed for the transpositions,
    /// as well as a scratch buffer shared by the rows and columns FFTs.
    ///
    /// Panics if the buffer length is not `width * height`.
    pub fn process(&self, buffer: &mut [Complex<f64>]) -> Result<()> {
        let (width, height) = (self.width, self.height);
        let len = sample_count("fft buffer", width, height)?;
        assert_eq!(buffer.len(), len, "buffer does not match the plan size");
        if len == 0 {
            return Ok(());
        }

        let scratch_len = self
            .rows
            .get_inplace_scratch_len()
            .max(self.columns.get_inplace_scratch_len());
        let mut scratch = try_filled("fft scratch", scratch_len, Complex::default())?;

        for row_buffer in buffer.chunks_exact_mut(width) {
            self.rows.process_with_scratch(row_buffer, &mut scratch);
        }

        // Transpose the image to be able to compute the FFT on the other dimension.
        let mut transposed = try_filled("fft transpose", len, Complex::default())?;
        transpose_into(width, height, buffer, &mut transposed);
        for col_buffer in transposed.chunks_exact_mut(height) {
            self.columns.process_with_scratch(col_buffer, &mut scratch);
        }
        transpose_into(height, width, &transposed, buffer);
        Ok(())
    }
}

/// Compute the 2D Fourier transform of an image buffer, in place and in row major order.
///
/// The transformation is not normalized.
/// If the transformed buffer is intended to be processed
/// and then converted back into an image with an inverse Fourier transform,
/// it is more efficient to multiply at the end by 1 / (width * height).
pub fn fft_2d(width: usize, height: usize, img_buffer: &mut [Complex<f64>]) -> Result<()> {
    Plan::forward(width, height).process(img_buffer)
}

/// Compute the inverse 2D Fourier transform to get back an image buffer.
///
/// The transformation is not normalized.
/// If this is used as a pair of FFT followed by inverse FFT,
/// it is more efficient to normalize only once by 1 / (width * height) at the end.
pub fn ifft_2d(width: usize, height: usize, img_buffer: &mut [Complex<f64>]) -> Result<()> {
    Plan::inverse(width, height).process(img_buffer)
}

/// Write the transposed of a `width` x `height` row major matrix into `transposed`.
fn transpose_into<T: Copy>(width: usize, height: usize, matrix: &[T], transposed: &mut [T]) {
    for (row, row_values) in matrix.chunks_exact(width).enumerate() {
        for (col, &value) in row_values.iter().enumerate() {
            transposed[col * height + row] = value;
        }
    }
}

/// Cyclic shift such that `rolled[y][x] = matrix[(y + shift_y) % height][(x + shift_x) % width]`.
fn roll<T: Copy + Default>(
    width: usize,
    height: usize,
    matrix: &[T],
    shift_x: usize,
    shift_y: usize,
) -> Vec<T> {
    let mut rolled = vec![T::default(); matrix.len()];
    if matrix.is_empty() {
        return rolled;
    }
    for (row, r_row) in rolled.chunks_exact_mut(width).enumerate() {
        let mrow_start = ((row + shift_y) % height) * width;
        let m_row = &matrix[mrow_start..mrow_start + width];
        // swap left and right
        r_row[..width - shift_x].copy_from_slice(&m_row[shift_x..]);
        r_row[width - shift_x..].copy_from_slice(&m_row[..shift_x]);
    }
    rolled
}

/// Shift the 4 quadrants of a Fourier transform to have all the low frequencies
/// at the center of the image.
///
/// The zero frequency lands at column `width / 2` and row `height / 2`.
pub fn fftshift<T: Copy + Default>(width: usize, height: usize, matrix: &[T]) -> Vec<T> {
    roll(width, height, matrix, width - width / 2, height - height / 2)
}

/// Inverse operation of the quadrants shift performed by fftshift.
///
/// It is different than fftshift if one dimension has an odd length.
pub fn ifftshift<T: Copy + Default>(width: usize, height: usize, matrix: &[T]) -> Vec<T> {
    roll(width, height, matrix, width / 2, height / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_buffer(len: usize, seed: u64) -> Vec<Complex<f64>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len)
            .map(|_| Complex::new(rng.random_range(-1.0..1.0), 0.0))
            .collect()
    }

    #[test]
    fn shift_round_trips_for_even_and_odd_sizes() {
        for (width, height) in [(16, 16), (15, 15), (16, 15), (15, 16)] {
            let original = random_buffer(width * height, (width * 31 + height) as u64);

            let shifted = fftshift(width, height, &original);
            let restored = ifftshift(width, height, &shifted);
            assert_eq!(restored, original, "fftshift then ifftshift, {width}x{height}");

            let shifted = ifftshift(width, height, &original);
            let restored = fftshift(width, height, &shifted);
            assert_eq!(restored, original, "ifftshift then fftshift, {width}x{height}");

            assert!(restored.iter().all(|c| c.im == 0.0));
        }
    }

    #[test]
    fn fftshift_moves_zero_frequency_to_center() {
        for (width, height) in [(4, 4), (5, 3), (6, 7)] {
            let mut matrix = vec![0u8; width * height];
            matrix[0] = 1;
            let shifted = fftshift(width, height, &matrix);
            let center = (height / 2) * width + width / 2;
            assert_eq!(shifted[center], 1, "{width}x{height}");
        }
    }

    #[test]
    fn transform_of_impulse_is_flat() {
        let (width, height) = (8, 6);
        let mut buffer = vec![Complex::default(); width * height];
        buffer[0] = Complex::new(1.0, 0.0);
        fft_2d(width, height, &mut buffer).unwrap();
        for c in &buffer {
            assert!((c - Complex::new(1.0, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn transform_is_row_major() {
        // A pure horizontal frequency must show up in the first row.
        let (width, height) = (8, 4);
        let mut buffer: Vec<Complex<f64>> = (0..width * height)
            .map(|i| {
                let x = (i % width) as f64;
                Complex::new((2.0 * std::f64::consts::PI * x / width as f64).cos(), 0.0)
            })
            .collect();
        fft_2d(width, height, &mut buffer).unwrap();
        let expected = (width * height) as f64 / 2.0;
        assert!((buffer[1].re - expected).abs() < 1e-9);
        assert!((buffer[width - 1].re - expected).abs() < 1e-9);
        assert!(buffer[width].norm() < 1e-9);
    }

    #[test]
    fn forward_then_inverse_scales_by_size() {
        let (width, height) = (12, 10);
        let original = random_buffer(width * height, 3);
        let mut buffer = original.clone();
        fft_2d(width, height, &mut buffer).unwrap();
        ifft_2d(width, height, &mut buffer).unwrap();
        let n = (width * height) as f64;
        for (a, b) in buffer.iter().zip(&original) {
            assert!((a / n - b).norm() < 1e-12);
        }
    }

    #[test]
    fn cleanup_leaves_live_plans_usable() {
        let plan = Plan::forward(4, 4);
        cleanup();
        let mut buffer = vec![Complex::new(1.0, 0.0); 16];
        plan.process(&mut buffer).unwrap();
        assert!((buffer[0].re - 16.0).abs() < 1e-12);
    }

    #[test]
    fn planning_after_cleanup_creates_a_new_planner() {
        cleanup();
        let (width, height) = (6, 10);
        let original = random_buffer(width * height, 11);
        let mut buffer = original.clone();
        Plan::forward(width, height).process(&mut buffer).unwrap();
        cleanup();
        Plan::inverse(width, height).process(&mut buffer).unwrap();
        let n = (width * height) as f64;
        for (a, b) in buffer.iter().zip(&original) {
            assert!((a / n - b).norm() < 1e-12);
        }
    }
}
