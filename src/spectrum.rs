// SPDX-License-Identifier: MPL-2.0

//! False color view of the magnitude spectrum of an image.

use rustfft::num_complex::Complex;

use crate::error::Result;
use crate::plane::{try_filled, Plane};
use crate::slice::fftshift;

/// Rec. 709 luminance weights.
const LUMINANCE: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Percentiles used as black and white points.
const BLACK_POINT: f64 = 0.05;
const WHITE_POINT: f64 = 0.95;

/// Relative range below which the spectrum is considered to carry no AC energy.
const FLAT_RANGE: f64 = 1e-12;

/// Heat palette: red saturates first, then green, then blue.
fn palette(t: f64) -> [f64; 3] {
    if !t.is_finite() {
        return [0.0; 3];
    }
    [
        (400.0 * t).clamp(0.0, 1.0),
        (20.0 * t).clamp(0.0, 1.0),
        t.clamp(0.0, 1.0),
    ]
}

/// Value at percentile `p` of sorted values.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    sorted[(p * (sorted.len() - 1) as f64) as usize]
}

/// Replace the spectra of the three color channels by a false color
/// visualization of their perceptual power.
///
/// The power is normalized between its 5th and 95th percentiles,
/// so a few very strong bins (such as the DC term) do not flatten the rest.
/// With `center` set, zero frequency is moved to the middle of the image.
///
/// Panics if the planes do not share the same dimensions.
pub fn visualize(planes: &mut [Plane; 3], center: bool) -> Result<()> {
    let (width, height) = planes[0].dimensions();
    for plane in planes.iter() {
        assert_eq!(plane.dimensions(), (width, height), "channel size mismatch");
    }
    let len = width * height;
    if len == 0 {
        return Ok(());
    }

    let mut power = try_filled("spectrum power", len, 0.0)?;
    for (plane, weight) in planes.iter().zip(LUMINANCE) {
        for (p, c) in power.iter_mut().zip(plane.as_slice()) {
            *p += weight * c.norm_sqr();
        }
    }

    let mut sorted = try_filled("spectrum power", len, 0.0)?;
    sorted.copy_from_slice(&power);
    sorted.sort_unstable_by(f64::total_cmp);
    let v0 = percentile(&sorted, BLACK_POINT);
    let v1 = percentile(&sorted, WHITE_POINT);
    let max = sorted[len - 1];
    let flat = v1 - v0 <= FLAT_RANGE * max;
    let k = 1.0 / v1;
    tracing::debug!(v0, v1, max, flat, "spectrum levels");

    for (i, &v) in power.iter().enumerate() {
        let t = if flat { 0.0 } else { k * (v - v0) };
        for (plane, value) in planes.iter_mut().zip(palette(t)) {
            plane.as_mut_slice()[i] = Complex::new(value, 0.0);
        }
    }

    if center {
        for plane in planes.iter_mut() {
            let shifted = fftshift(width, height, plane.as_slice());
            *plane = Plane::from_vec(width, height, shifted);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::fft_2d;

    fn spectra(width: usize, height: usize, f: impl Fn(usize, usize) -> f64) -> [Plane; 3] {
        let values: Vec<f64> = (0..width * height).map(|i| f(i % width, i / width)).collect();
        let mut plane = Plane::from_real(width, height, &values);
        fft_2d(width, height, plane.as_mut_slice()).unwrap();
        [plane.clone(), plane.clone(), plane]
    }

    #[test]
    fn palette_handles_non_finite_values() {
        assert_eq!(palette(f64::NAN), [0.0; 3]);
        assert_eq!(palette(f64::INFINITY), [0.0; 3]);
        assert_eq!(palette(-1.0), [0.0; 3]);
        assert_eq!(palette(0.03125), [1.0, 0.625, 0.03125]);
        assert_eq!(palette(2.0), [1.0; 3]);
    }

    #[test]
    fn constant_image_gives_uniform_black() {
        let mut planes = spectra(32, 32, |_, _| 0.5);
        visualize(&mut planes, false).unwrap();
        for plane in &planes {
            assert!(plane.as_slice().iter().all(|c| *c == Complex::default()));
        }
    }

    #[test]
    fn textured_image_spans_the_palette() {
        let mut planes = spectra(32, 32, |x, y| ((x * 7 + y * 13) % 17) as f64 / 17.0);
        visualize(&mut planes, false).unwrap();
        let reds: Vec<f64> = planes[0].as_slice().iter().map(|c| c.re).collect();
        assert!(reds.iter().all(|r| (0.0..=1.0).contains(r)));
        assert!(reds.iter().any(|&r| r == 0.0));
        assert!(reds.iter().any(|&r| r == 1.0));
        // The DC term is the strongest bin and saturates every channel.
        for plane in &planes {
            assert_eq!(plane.get(0, 0).re, 1.0);
        }
    }

    #[test]
    fn centered_view_moves_dc_to_middle() {
        let mut planes = spectra(16, 10, |x, y| ((x * 3 + y * 5) % 7) as f64);
        visualize(&mut planes, true).unwrap();
        assert_eq!(planes[2].get(8, 5).re, 1.0);
    }
}
