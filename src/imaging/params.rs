//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how*. They sit between the batch
//! stage in [`crate::process`] (which decides the crop rectangle) and the
//! [`backend`](super::backend) (which does the pixel work), so the backend can
//! be swapped for a mock in tests.
//!
//! - [`Quality`]: JPEG encoding quality, fixed at 90.
//! - [`CropParams`]: source, output path, crop rectangle and the resolution to record.

use crate::measure::Resolution;
use std::path::PathBuf;

/// JPEG quality used for every crop.
pub const DEFAULT_QUALITY: u8 = 90;

/// Quality setting for lossy image encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

/// Keep the `width` x `height` region anchored at the top-left corner of
/// `source` and write it to `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct CropParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Resolution written into the output header where the format allows it.
    pub resolution: Resolution,
    pub quality: Quality,
}
