// SPDX-License-Identifier: MPL-2.0

//! Mirror edge extension between images and complex planes.
//!
//! The FFT treats its input as periodic. Padding every side with a mirrored
//! copy of the image removes the discontinuity at the wrap-around, so that
//! filtering does not bleed the left edge into the right one.

use rustfft::num_complex::Complex;

use crate::codec::Image;
use crate::error::Result;
use crate::plane::Plane;

/// Size of a `width` x `height` image extended by `amount` pixels on each side.
pub fn extended_size(width: usize, height: usize, amount: usize) -> (usize, usize) {
    (width + 2 * amount, height + 2 * amount)
}

/// Largest extension for which mirroring stays inside the image.
pub fn max_extension(width: usize, height: usize) -> usize {
    width.min(height).saturating_sub(1)
}

/// Source index of coordinate `i` of an axis of length `size` extended by `amount`.
///
/// The leading border reflects around the first pixel, the trailing border
/// starts with a copy of the last pixel.
fn mirror(i: usize, amount: usize, size: usize) -> usize {
    if i < amount {
        amount - i
    } else if i < amount + size {
        i - amount
    } else {
        2 * size + amount - i - 1
    }
}

/// Lookup table from 8 bit samples to linear light.
struct ColorDecoder {
    table: [f64; 256],
}

impl ColorDecoder {
    fn new(gamma: f64) -> Self {
        let mut table = [0.0; 256];
        for (i, value) in table.iter_mut().enumerate() {
            *value = (i as f64 / 255.0).powf(1.0 / gamma);
        }
        Self { table }
    }

    fn decode(&self, byte: u8) -> Complex<f64> {
        Complex::new(self.table[byte as usize], 0.0)
    }
}

/// Linear light back to 8 bit samples.
struct ColorEncoder {
    gamma: f64,
}

impl ColorEncoder {
    fn encode(&self, c: Complex<f64>) -> u8 {
        // NaN fails the comparison and encodes to zero as well.
        if !(c.re > 0.0) {
            return 0;
        }
        (255.0 * c.re.powf(self.gamma)).round().clamp(0.0, 255.0) as u8
    }
}

/// Load the three color channels of `image` into planes extended by `amount`
/// mirrored pixels on each side, decoding to linear light.
///
/// Panics if `amount` exceeds [`max_extension`].
pub fn extend(image: &Image, amount: usize) -> Result<[Plane; 3]> {
    let (width, height) = image.dimensions();
    assert!(
        amount <= max_extension(width, height),
        "extension of {amount} pixels is too large for a {width}x{height} image"
    );
    let (ext_width, ext_height) = extended_size(width, height, amount);
    let decoder = ColorDecoder::new(image.gamma());

    let mut planes = [
        Plane::zeroed(ext_width, ext_height)?,
        Plane::zeroed(ext_width, ext_height)?,
        Plane::zeroed(ext_width, ext_height)?,
    ];
    let columns: Vec<usize> = (0..ext_width).map(|x| mirror(x, amount, width)).collect();
    for y in 0..ext_height {
        let iy = mirror(y, amount, height);
        for (x, &ix) in columns.iter().enumerate() {
            let rgb = image.get(ix, iy);
            for (plane, byte) in planes.iter_mut().zip(rgb) {
                *plane.get_mut(x, y) = decoder.decode(byte);
            }
        }
    }
    Ok(planes)
}

/// Write the inner region of planes extended by `amount` pixels into `image`,
/// encoding linear light with the gamma of the image.
///
/// Panics if the planes are not the size of the image extended by `amount`.
pub fn crop(amount: usize, planes: &[Plane; 3], image: &mut Image) {
    let (width, height) = image.dimensions();
    let expected = extended_size(width, height, amount);
    for plane in planes {
        assert_eq!(
            plane.dimensions(),
            expected,
            "plane does not match the extended image size"
        );
    }
    let encoder = ColorEncoder {
        gamma: image.gamma(),
    };
    for y in 0..height {
        for x in 0..width {
            let rgb = planes
                .each_ref()
                .map(|plane| encoder.encode(plane.get(x + amount, y + amount)));
            image.put(x, y, rgb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_image(width: u32, height: u32, seed: u64) -> Image {
        let mut rng = StdRng::seed_from_u64(seed);
        let pixels = RgbImage::from_fn(width, height, |_, _| Rgb(rng.random()));
        Image::from_rgb(pixels, Image::DEFAULT_GAMMA)
    }

    #[test]
    fn mirror_reflects_across_both_borders() {
        let indices: Vec<usize> = (0..10).map(|i| mirror(i, 3, 4)).collect();
        assert_eq!(indices, vec![3, 2, 1, 0, 1, 2, 3, 3, 2, 1]);
    }

    #[test]
    fn extend_then_crop_is_lossless() {
        for (width, height, amount) in [(17, 11, 0), (17, 11, 5), (8, 8, 7), (1, 6, 0)] {
            let image = random_image(width, height, amount as u64);
            let planes = extend(&image, amount).unwrap();
            assert_eq!(
                planes[0].dimensions(),
                extended_size(width as usize, height as usize, amount)
            );

            let mut restored = Image::new(width as usize, height as usize, image.gamma());
            crop(amount, &planes, &mut restored);
            assert_eq!(restored.as_rgb(), image.as_rgb(), "{width}x{height} + {amount}");
        }
    }

    #[test]
    fn extension_mirrors_the_border() {
        let image = random_image(6, 5, 9);
        let amount = 2;
        let planes = extend(&image, amount).unwrap();
        let decoder = ColorDecoder::new(image.gamma());
        // Extended (0, 0) reads source (2, 2), (8, 3) reads (5, 1), (9, 6) reads (4, 4).
        assert_eq!(planes[1].get(0, 0), decoder.decode(image.get(2, 2)[1]));
        assert_eq!(planes[0].get(8, 3), decoder.decode(image.get(5, 1)[0]));
        assert_eq!(planes[2].get(9, 6), decoder.decode(image.get(4, 4)[2]));
    }

    #[test]
    fn encoder_clamps_out_of_range_values() {
        let encoder = ColorEncoder { gamma: 2.2 };
        assert_eq!(encoder.encode(Complex::new(-0.5, 0.0)), 0);
        assert_eq!(encoder.encode(Complex::new(f64::NAN, 0.0)), 0);
        assert_eq!(encoder.encode(Complex::new(1.7, 0.0)), 255);
        assert_eq!(encoder.encode(Complex::new(f64::INFINITY, 0.0)), 255);
        assert_eq!(encoder.encode(Complex::new(1.0, 3.0)), 255);
    }

    #[test]
    fn decoding_uses_the_image_gamma() {
        let decoder = ColorDecoder::new(2.0);
        assert_eq!(decoder.decode(0).re, 0.0);
        assert_eq!(decoder.decode(255).re, 1.0);
        assert!((decoder.decode(64).re - (64.0f64 / 255.0).sqrt()).abs() < 1e-15);
    }
}
