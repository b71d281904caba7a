// SPDX-License-Identifier: MPL-2.0

//! 2x resampling by splicing the quadrants of an unshifted spectrum.
//!
//! Low frequencies live in the four corners of an unshifted 2D spectrum.
//! Halving the image keeps the corners of a half sized spectrum,
//! doubling it moves the corners apart and zero fills the new middle band.

use crate::error::Result;
use crate::plane::Plane;

/// Source index along an axis of length `src` for destination index `i`
/// along an axis of length `dst <= src`: the first `ceil(dst / 2)` indices are
/// the non-negative frequencies, the rest the highest negative ones.
///
/// An odd `dst` keeps frequencies `-(dst / 2)..=dst / 2`, so conjugate pairs
/// stay together and a single bin axis keeps zero frequency.
fn corner_index(i: usize, src: usize, dst: usize) -> usize {
    if i < dst.div_ceil(2) {
        i
    } else {
        src + i - dst
    }
}

/// Halve a `w` x `h` spectrum into `(w / 2)` x `(h / 2)` by keeping the
/// frequencies nearest to zero and discarding everything else.
///
/// This is a truncating low-pass resample: apply an anti-aliasing kernel first.
/// Both dimensions are expected to be even.
pub fn downsample_2x(src: &Plane) -> Result<Plane> {
    let (w0, h0) = src.dimensions();
    let (w1, h1) = (w0 / 2, h0 / 2);
    let mut dst = Plane::zeroed(w1, h1)?;
    let columns: Vec<usize> = (0..w1).map(|x1| corner_index(x1, w0, w1)).collect();
    for (y1, dst_row) in dst.rows_mut().enumerate() {
        let y0 = corner_index(y1, h0, h1);
        let src_row = &src.as_slice()[y0 * w0..(y0 + 1) * w0];
        for (value, &x0) in dst_row.iter_mut().zip(&columns) {
            *value = src_row[x0];
        }
    }
    Ok(dst)
}

/// Double a `w` x `h` spectrum into `(2 * w)` x `(2 * h)`: the original
/// coefficients go to the four corners and the new high frequencies are zero.
///
/// Both dimensions are expected to be even.
pub fn upsample_2x(src: &Plane) -> Result<Plane> {
    let (w0, h0) = src.dimensions();
    let (w1, h1) = (w0 * 2, h0 * 2);
    let mut dst = Plane::zeroed(w1, h1)?;
    let columns: Vec<usize> = (0..w0).map(|x0| corner_index_inverse(x0, w0, w1)).collect();
    for (y0, src_row) in src.rows().enumerate() {
        let y1 = corner_index_inverse(y0, h0, h1);
        let dst_row = &mut dst.as_mut_slice()[y1 * w1..(y1 + 1) * w1];
        for (&value, &x1) in src_row.iter().zip(&columns) {
            dst_row[x1] = value;
        }
    }
    Ok(dst)
}

/// Destination index along an axis of length `dst >= src` for source index `i`,
/// the inverse of [`corner_index`].
fn corner_index_inverse(i: usize, src: usize, dst: usize) -> usize {
    if i < src.div_ceil(2) {
        i
    } else {
        dst + i - src
    }
}
