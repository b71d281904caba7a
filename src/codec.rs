// SPDX-License-Identifier: MPL-2.0

//! RGB images read from and written to disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::{Error, Result};

/// An 8 bit RGB image together with the gamma exponent of its encoding.
///
/// Stored bytes relate to linear light by `byte / 255 = linear ^ (1 / gamma)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: RgbImage,
    gamma: f64,
}

impl Image {
    /// Gamma assumed when the source does not declare a usable one.
    pub const DEFAULT_GAMMA: f64 = 2.2;

    /// A black image of the given size.
    pub fn new(width: usize, height: usize, gamma: f64) -> Self {
        Self::from_rgb(RgbImage::new(width as u32, height as u32), gamma)
    }

    /// Wrap decoded pixels. Non-positive or non-finite gamma falls back to the default.
    pub fn from_rgb(pixels: RgbImage, gamma: f64) -> Self {
        let gamma = if gamma.is_finite() && gamma > 0.0 {
            gamma
        } else {
            Self::DEFAULT_GAMMA
        };
        Self { pixels, gamma }
    }

    /// Decode an image file.
    ///
    /// For PNG files a declared `gAMA` chunk sets the gamma exponent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pixels = image::open(path)
            .map_err(|source| Error::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        let gamma = declared_gamma(path).unwrap_or(Self::DEFAULT_GAMMA);
        tracing::debug!(path = %path.display(), gamma, "decoded image");
        Ok(Self::from_rgb(pixels, gamma))
    }

    /// Encode the image, the format being chosen from the file extension.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.pixels.save(path).map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.pixels.width() as usize
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.pixels.height() as usize
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Gamma exponent used to decode and encode the bytes.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// RGB bytes of the pixel at column `x` and row `y`.
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels.get_pixel(x as u32, y as u32).0
    }

    /// Overwrite the pixel at column `x` and row `y`.
    pub fn put(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        self.pixels.put_pixel(x as u32, y as u32, Rgb(rgb));
    }

    /// Underlying pixel buffer.
    pub fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }
}

/// Display gamma declared by a PNG `gAMA` chunk.
///
/// The chunk stores the file gamma `g`, the exponent applied when encoding,
/// so the display exponent is `1 / g`.
fn declared_gamma(path: &Path) -> Option<f64> {
    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        return None;
    }
    let file = File::open(path).ok()?;
    let reader = match png::Decoder::new(BufReader::new(file)).read_info() {
        Ok(reader) => reader,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring png metadata");
            return None;
        }
    };
    let file_gamma = f64::from(reader.info().source_gamma?.into_value());
    (file_gamma > 0.0).then(|| 1.0 / file_gamma)
}
