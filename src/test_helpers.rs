//! Shared test utilities for the cropscan test suite.
//!
//! Writes small synthetic images into temp directories so the backend, search
//! and batch tests work against real files without checked-in fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let scan = tmp.path().join("scan.jpg");
//! create_test_jpeg(&scan, 600, 400, Some(300));
//!
//! assert_eq!(image_size(&scan), (600, 400));
//! ```

use image::codecs::jpeg::{JpegEncoder, PixelDensity, PixelDensityUnit};
use image::{ImageEncoder, RgbImage};
use std::path::{Path, PathBuf};

pub use tempfile::TempDir;

// =========================================================================
// Image fixtures
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write a JPEG of the given size. `dpi` is recorded in the JFIF header;
/// `None` leaves the encoder default (aspect ratio only, no resolution).
pub fn create_test_jpeg(path: &Path, width: u32, height: u32, dpi: Option<u16>) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    let mut encoder = JpegEncoder::new(writer);
    if let Some(dpi) = dpi {
        encoder.set_pixel_density(PixelDensity {
            density: (dpi, dpi),
            unit: PixelDensityUnit::Inches,
        });
    }
    encoder
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a PNG of the given size (no `pHYs` chunk).
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height).save(path).unwrap();
}

/// Create an empty file, for search tests that never decode.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"").unwrap();
}

// =========================================================================
// Assertions
// =========================================================================

/// Pixel size of an image on disk. Panics if it cannot be read.
pub fn image_size(path: &Path) -> (u32, u32) {
    image::image_dimensions(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// File names (not paths) relative to `root`, sorted, for compact assertions.
pub fn relative_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = files
        .iter()
        .map(|f| {
            f.strip_prefix(root)
                .unwrap_or(f)
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    names.sort();
    names
}
