// SPDX-License-Identifier: MPL-2.0

//! Error type shared by every stage of the filter pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a filter run.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid option or kernel parameter, detected before any pipeline work.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The input image could not be read or decoded.
    #[error("failed to decode '{path}': {source}")]
    Decode {
        /// Input path.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// The image has a size the selected method cannot process.
    #[error("{method} cannot process a {width}x{height} image: {reason}")]
    UnsupportedDimensions {
        /// Name of the selected method.
        method: &'static str,
        /// Image width.
        width: usize,
        /// Image height.
        height: usize,
        /// Why the size is rejected.
        reason: &'static str,
    },

    /// A plane or scratch buffer could not be allocated.
    #[error("failed to allocate {what} of {len} samples")]
    Allocation {
        /// Which buffer.
        what: &'static str,
        /// Requested number of samples, saturated on overflow.
        len: usize,
    },

    /// The output image could not be written.
    #[error("failed to encode '{path}': {source}")]
    Encode {
        /// Output path.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
