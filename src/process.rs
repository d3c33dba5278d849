//! Batch cropping.
//!
//! Takes the resolved file list and the validated [`Config`] and crops every
//! file in turn. Each file goes through the same steps:
//!
//! 1. **Identify**: pixel size and recorded resolution from the backend.
//! 2. **Plan**: effective resolution (recorded, raised to the configured
//!    minimum), output size per axis, output path. Pure, see [`plan_crop`].
//! 3. **Crop**: skipped when the plan changes nothing or in what-if mode. A
//!    plan with a zero-pixel axis fails the file before anything is written.
//!
//! Every file produces exactly one [`FileOutcome`], handed to the caller's
//! callback as soon as it is known. A failing file is reported and the batch
//! moves on; nothing about it leaks into the next file.
//!
//! ## Example
//!
//! ```text
//! 1000x800px at 300dpi, -w 2cm, -s -c
//!
//! source  8.47 x 6.77 cm   1000 x 800 px
//! output  2.00 x 6.77 cm    236 x 800 px   (2 cm * 300 / 2.54 = 236.2)
//! path    scan.jpg → scan-c.jpg
//! ```

use crate::config::Config;
use crate::imaging::{
    BackendError, CropParams, Dimensions, ImageBackend, ImageInfo, effective_resolution,
    output_pixels, pixels_to_cm,
};
use crate::measure::{Centimetres, Resolution};
use crate::naming::output_path;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Cannot read \"{}\": {source}", path.display())]
    Identify {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Cannot crop \"{}\": the new size {size} has no pixels", path.display())]
    Empty { path: PathBuf, size: Dimensions },
    #[error("Cannot crop \"{}\": {source}", path.display())]
    Crop {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Everything decided about one file before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct CropPlan {
    pub source: PathBuf,
    pub output: PathBuf,
    pub source_size: Dimensions,
    pub output_size: Dimensions,
    /// Recorded resolution raised to the configured minimum.
    pub resolution: Resolution,
}

impl CropPlan {
    pub fn is_unchanged(&self) -> bool {
        self.output_size == self.source_size
    }

    /// A target shorter than half a pixel rounds an axis down to nothing.
    pub fn is_empty(&self) -> bool {
        self.output_size.width == 0 || self.output_size.height == 0
    }

    /// Physical size of the source at the effective resolution.
    pub fn source_cm(&self) -> (Centimetres, Centimetres) {
        self.physical(self.source_size)
    }

    /// Physical size of the output at the effective resolution.
    pub fn output_cm(&self) -> (Centimetres, Centimetres) {
        self.physical(self.output_size)
    }

    fn physical(&self, size: Dimensions) -> (Centimetres, Centimetres) {
        (
            pixels_to_cm(size.width, self.resolution.x),
            pixels_to_cm(size.height, self.resolution.y),
        )
    }
}

/// Compute the crop for one identified image.
pub fn plan_crop(path: &Path, info: &ImageInfo, config: &Config) -> CropPlan {
    let resolution = effective_resolution(info.resolution, config.min_resolution);
    let source_size = info.dimensions;
    let output_size = Dimensions {
        width: output_pixels(source_size.width, resolution.x, config.width),
        height: output_pixels(source_size.height, resolution.y, config.height),
    };
    CropPlan {
        source: path.to_path_buf(),
        output: output_path(path, &config.suffix),
        source_size,
        output_size,
        resolution,
    }
}

/// What happened to one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Already within the target size; the file was not touched.
    Unchanged(CropPlan),
    /// Cropped, or would have been in what-if mode.
    Cropped { plan: CropPlan, what_if: bool },
    Failed(ProcessError),
}

/// Tally of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub cropped: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.cropped + self.unchanged + self.failed
    }

    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Unchanged(_) => self.unchanged += 1,
            FileOutcome::Cropped { .. } => self.cropped += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Identify, plan and (unless what-if) crop a single file.
pub fn process_file(backend: &impl ImageBackend, path: &Path, config: &Config) -> FileOutcome {
    let info = match backend.identify(path) {
        Ok(info) => info,
        Err(source) => {
            return FileOutcome::Failed(ProcessError::Identify {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let plan = plan_crop(path, &info, config);
    if plan.resolution != info.resolution {
        tracing::debug!(
            "{}: recorded resolution {} raised to {}",
            path.display(),
            info.resolution,
            plan.resolution
        );
    }
    tracing::debug!(
        "{}: {} -> {} at {}",
        path.display(),
        plan.source_size,
        plan.output_size,
        plan.resolution
    );

    if plan.is_unchanged() {
        return FileOutcome::Unchanged(plan);
    }
    if plan.is_empty() {
        return FileOutcome::Failed(ProcessError::Empty {
            path: path.to_path_buf(),
            size: plan.output_size,
        });
    }
    if config.what_if {
        return FileOutcome::Cropped { plan, what_if: true };
    }

    let params = CropParams {
        source: plan.source.clone(),
        output: plan.output.clone(),
        width: plan.output_size.width,
        height: plan.output_size.height,
        resolution: plan.resolution,
        quality: config.quality,
    };
    match backend.crop(&params) {
        Ok(()) => FileOutcome::Cropped { plan, what_if: false },
        Err(source) => FileOutcome::Failed(ProcessError::Crop {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Process `files` in order, reporting each outcome through `on_outcome`.
pub fn process(
    backend: &impl ImageBackend,
    files: &[PathBuf],
    config: &Config,
    mut on_outcome: impl FnMut(&FileOutcome),
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for path in files {
        let outcome = process_file(backend, path, config);
        summary.record(&outcome);
        on_outcome(&outcome);
    }
    summary
}
