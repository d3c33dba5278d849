//! Image processing, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions`, format sniffed from content |
//! | **Resolution** | header reader (JPEG JFIF/EXIF, PNG `pHYs`), `tiff` decoder for TIFF |
//! | **Crop** | `crop_imm` at the top-left corner |
//! | **Encode** | source format in memory; JPEG, PNG and TIFF record the resolution |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for length/pixel math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Resolution**: header parsing for recorded pixel density

pub mod backend;
mod calculations;
mod params;
pub mod resolution;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, ImageInfo};
pub use calculations::{cm_to_pixels, effective_resolution, output_pixels, pixels_to_cm};
pub use params::{CropParams, DEFAULT_QUALITY, Quality};
pub use rust_backend::RustBackend;
