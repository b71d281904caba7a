// SPDX-License-Identifier: MPL-2.0

//! Frequency-domain filters for images.
//!
//! Each color channel is extended with mirrored borders, transformed with a
//! 2D FFT, multiplied by the spectrum of a synthesized kernel, optionally
//! resampled by splicing its spectrum, and transformed back.
//! Supported filters are Gaussian blur, 2x downscale, 2x upscale,
//! a false color spectrum view and an identity pass.

#![warn(missing_docs)]

pub mod codec;
pub mod config;
pub mod error;
pub mod extend;
pub mod kernel;
pub mod pipeline;
pub mod plane;
pub mod resample;
// default implementation on mutable slices
pub mod slice;
pub mod spectrum;

pub use codec::Image;
pub use config::{FilterOptions, Method, Options};
pub use error::{Error, Result};
pub use kernel::Kernel;
pub use pipeline::{run, Pipeline};
pub use plane::Plane;
