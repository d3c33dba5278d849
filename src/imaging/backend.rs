//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the batch stage
//! needs: identify (pixel size plus recorded resolution) and crop.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the `MockBackend` below, which records calls instead of
//! touching pixels.

use super::params::CropParams;
use crate::measure::Resolution;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}px", self.width, self.height)
    }
}

/// Result of an identify operation.
///
/// `resolution` is [`Resolution::UNKNOWN`] when the file records none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub dimensions: Dimensions,
    pub resolution: Resolution,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Read pixel dimensions and recorded resolution without decoding pixels.
    fn identify(&self, path: &Path) -> Result<ImageInfo, BackendError>;

    /// Keep the top-left `width` x `height` region and write it to the output path.
    fn crop(&self, params: &CropParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::measure::Dpi;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    ///
    /// `identify` answers from a per-path table; unknown paths fail, as do
    /// crops of paths registered with [`MockBackend::fail_crop`].
    #[derive(Default)]
    pub struct MockBackend {
        pub images: Mutex<HashMap<PathBuf, ImageInfo>>,
        pub failing_crops: Mutex<Vec<PathBuf>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Crop {
            source: String,
            output: String,
            width: u32,
            height: u32,
            resolution: Resolution,
            quality: u8,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register an image of `width` x `height` at a uniform `dpi`
        /// (`0` for "no resolution recorded").
        pub fn with_image(self, path: impl Into<PathBuf>, width: u32, height: u32, dpi: u64) -> Self {
            self.images.lock().unwrap().insert(
                path.into(),
                ImageInfo {
                    dimensions: Dimensions { width, height },
                    resolution: Resolution::uniform(Dpi::from_whole(dpi)),
                },
            );
            self
        }

        pub fn fail_crop(self, path: impl Into<PathBuf>) -> Self {
            self.failing_crops.lock().unwrap().push(path.into());
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn crops(&self) -> Vec<RecordedOp> {
            self.get_operations()
                .into_iter()
                .filter(|op| matches!(op, RecordedOp::Crop { .. }))
                .collect()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<ImageInfo, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            self.images
                .lock()
                .unwrap()
                .get(path)
                .copied()
                .ok_or_else(|| BackendError::ProcessingFailed("No mock image".to_string()))
        }

        fn crop(&self, params: &CropParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Crop {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                resolution: params.resolution,
                quality: params.quality.value(),
            });

            if self.failing_crops.lock().unwrap().contains(&params.source) {
                return Err(BackendError::ProcessingFailed("Mock crop failure".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn mock_identify_returns_registered_image() {
        let backend = MockBackend::new().with_image("/scan.jpg", 1000, 800, 300);

        let info = backend.identify(Path::new("/scan.jpg")).unwrap();
        assert_eq!(info.dimensions, Dimensions { width: 1000, height: 800 });
        assert_eq!(info.resolution, Resolution::uniform(Dpi::from_whole(300)));
    }

    #[test]
    fn mock_identify_unknown_path_errors() {
        let backend = MockBackend::new();
        assert!(backend.identify(Path::new("/missing.jpg")).is_err());
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Identify("/missing.jpg".to_string())]
        );
    }

    #[test]
    fn mock_records_crop() {
        let backend = MockBackend::new();

        backend
            .crop(&CropParams {
                source: "/scan.jpg".into(),
                output: "/scan-c.jpg".into(),
                width: 236,
                height: 800,
                resolution: Resolution::uniform(Dpi::from_whole(300)),
                quality: Default::default(),
            })
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Crop {
                width: 236,
                height: 800,
                quality: 90,
                ..
            }
        ));
    }

    #[test]
    fn mock_crop_failure_is_still_recorded() {
        let backend = MockBackend::new().fail_crop("/bad.jpg");
        let result = backend.crop(&CropParams {
            source: "/bad.jpg".into(),
            output: "/bad.jpg".into(),
            width: 1,
            height: 1,
            resolution: Resolution::UNKNOWN,
            quality: Default::default(),
        });
        assert!(result.is_err());
        assert_eq!(backend.crops().len(), 1);
    }

    #[test]
    fn dimensions_display() {
        assert_eq!(Dimensions { width: 236, height: 800 }.to_string(), "236x800px");
    }
}
