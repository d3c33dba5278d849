//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` + [`read_resolution`](super::resolution::read_resolution) |
//! | Decode (JPEG, PNG, TIFF, WebP, BMP) | `image::ImageReader`, format sniffed from content |
//! | Crop | `image::DynamicImage::crop_imm` anchored at (0, 0) |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` with quality and JFIF density |
//! | Encode PNG | `png::Encoder` with a `pHYs` chunk |
//! | Encode TIFF | `tiff::encoder::TiffEncoder` with `XResolution`/`YResolution` |
//! | Encode others | `image::DynamicImage::write_to`, same format as the source |
//!
//! WebP and BMP output carries no resolution.
//!
//! The output is encoded in memory and only written once encoding succeeded,
//! so a failed crop never truncates the file it was reading from.

use super::backend::{BackendError, Dimensions, ImageBackend, ImageInfo};
use super::params::{CropParams, Quality};
use super::resolution::read_resolution;
use crate::measure::{Dpi, Resolution};
use image::codecs::jpeg::{JpegEncoder, PixelDensity, PixelDensityUnit};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tiff::encoder::colortype::{self, ColorType as TiffColorType};
use tiff::encoder::{Rational, TiffEncoder, TiffValue};
use tiff::tags::ResolutionUnit;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, returning the detected format too.
fn load_image(path: &Path) -> Result<(DynamicImage, ImageFormat), BackendError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format().ok_or_else(|| {
        BackendError::ProcessingFailed(format!("Unrecognized image format: {}", path.display()))
    })?;
    let img = reader.decode().map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
    })?;
    Ok((img, format))
}

/// The resolution to record, or `None` when either axis is unknown.
fn known(resolution: Resolution) -> Option<(Dpi, Dpi)> {
    let Resolution { x, y } = resolution;
    (x != Dpi::ZERO && y != Dpi::ZERO).then_some((x, y))
}

fn encode_failed(format: ImageFormat, e: impl std::fmt::Display) -> BackendError {
    BackendError::ProcessingFailed(format!("{format:?} encode failed: {e}"))
}

/// Encode in the source format, recording `resolution` where the format has a field for it.
fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    quality: Quality,
    resolution: Resolution,
) -> Result<Vec<u8>, BackendError> {
    match format {
        ImageFormat::Jpeg => encode_jpeg(img, quality, resolution),
        ImageFormat::Png => encode_png(img, resolution),
        ImageFormat::Tiff => encode_tiff(img, resolution),
        other => {
            let mut bytes = Cursor::new(Vec::new());
            img.write_to(&mut bytes, other)
                .map_err(|e| encode_failed(other, e))?;
            Ok(bytes.into_inner())
        }
    }
}

fn encode_jpeg(
    img: &DynamicImage,
    quality: Quality,
    resolution: Resolution,
) -> Result<Vec<u8>, BackendError> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.value());
    if let Some((x, y)) = known(resolution) {
        encoder.set_pixel_density(PixelDensity {
            density: (x.to_whole_u16(), y.to_whole_u16()),
            unit: PixelDensityUnit::Inches,
        });
    }

    // The baseline encoder takes 8-bit grey or RGB only
    let result = match img.color() {
        ColorType::L8 | ColorType::Rgb8 => img.write_with_encoder(encoder),
        _ => DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder),
    };
    result.map_err(|e| encode_failed(ImageFormat::Jpeg, e))?;
    Ok(bytes)
}

/// 16-bit samples as PNG wants them: big-endian.
fn be_bytes(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

fn encode_png(img: &DynamicImage, resolution: Resolution) -> Result<Vec<u8>, BackendError> {
    use png::{BitDepth, ColorType as Png};

    let raw = Cow::Borrowed(img.as_bytes());
    let wide = |samples: &[u16]| Cow::Owned(be_bytes(samples));
    let (color, depth, data): (Png, BitDepth, Cow<[u8]>) = match img.color() {
        ColorType::L8 => (Png::Grayscale, BitDepth::Eight, raw),
        ColorType::La8 => (Png::GrayscaleAlpha, BitDepth::Eight, raw),
        ColorType::Rgb8 => (Png::Rgb, BitDepth::Eight, raw),
        ColorType::Rgba8 => (Png::Rgba, BitDepth::Eight, raw),
        ColorType::L16 => (Png::Grayscale, BitDepth::Sixteen, wide(img.to_luma16().as_raw())),
        ColorType::La16 => (
            Png::GrayscaleAlpha,
            BitDepth::Sixteen,
            wide(img.to_luma_alpha16().as_raw()),
        ),
        ColorType::Rgb16 => (Png::Rgb, BitDepth::Sixteen, wide(img.to_rgb16().as_raw())),
        _ => (Png::Rgba, BitDepth::Sixteen, wide(img.to_rgba16().as_raw())),
    };

    let failed = |e: png::EncodingError| encode_failed(ImageFormat::Png, e);
    let mut bytes = Vec::new();
    let mut encoder = png::Encoder::new(&mut bytes, img.width(), img.height());
    encoder.set_color(color);
    encoder.set_depth(depth);
    if let Some((x, y)) = known(resolution) {
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: x.to_dots_per_metre(),
            yppu: y.to_dots_per_metre(),
            unit: png::Unit::Meter,
        }));
    }
    let mut writer = encoder.write_header().map_err(failed)?;
    writer.write_image_data(&data).map_err(failed)?;
    writer.finish().map_err(failed)?;
    Ok(bytes)
}

/// TIFF rational in dpi: hundredths over 100, so the value reads back exactly.
fn dpi_rational(dpi: Dpi) -> Rational {
    Rational {
        n: u32::try_from(dpi.hundredths()).unwrap_or(u32::MAX),
        d: 100,
    }
}

fn encode_tiff(img: &DynamicImage, resolution: Resolution) -> Result<Vec<u8>, BackendError> {
    let mut bytes = Cursor::new(Vec::new());
    {
        let mut encoder =
            TiffEncoder::new(&mut bytes).map_err(|e| encode_failed(ImageFormat::Tiff, e))?;
        let (w, h, r) = (img.width(), img.height(), resolution);
        let e = &mut encoder;

        match img.color() {
            ColorType::L8 => write_tiff::<colortype::Gray8, _>(e, w, h, img.as_bytes(), r),
            ColorType::Rgb8 => write_tiff::<colortype::RGB8, _>(e, w, h, img.as_bytes(), r),
            ColorType::Rgba8 => write_tiff::<colortype::RGBA8, _>(e, w, h, img.as_bytes(), r),
            ColorType::L16 => {
                write_tiff::<colortype::Gray16, _>(e, w, h, img.to_luma16().as_raw(), r)
            }
            ColorType::Rgb16 => {
                write_tiff::<colortype::RGB16, _>(e, w, h, img.to_rgb16().as_raw(), r)
            }
            color if color.has_alpha() => {
                write_tiff::<colortype::RGBA16, _>(e, w, h, img.to_rgba16().as_raw(), r)
            }
            _ => write_tiff::<colortype::RGB16, _>(e, w, h, img.to_rgb16().as_raw(), r),
        }?;
    }
    Ok(bytes.into_inner())
}

fn write_tiff<C, W>(
    encoder: &mut TiffEncoder<W>,
    width: u32,
    height: u32,
    data: &[C::Inner],
    resolution: Resolution,
) -> Result<(), BackendError>
where
    C: TiffColorType,
    W: Write + Seek,
    [C::Inner]: TiffValue,
{
    let failed = |e: tiff::TiffError| encode_failed(ImageFormat::Tiff, e);
    let mut image = encoder.new_image::<C>(width, height).map_err(failed)?;
    if let Some((x, y)) = known(resolution) {
        image.resolution_unit(ResolutionUnit::Inch);
        image.x_resolution(dpi_rational(x));
        image.y_resolution(dpi_rational(y));
    }
    image.write_data(data).map_err(failed)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<ImageInfo, BackendError> {
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
            })?;
        Ok(ImageInfo {
            dimensions: Dimensions { width, height },
            resolution: read_resolution(path),
        })
    }

    fn crop(&self, params: &CropParams) -> Result<(), BackendError> {
        if params.width == 0 || params.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Crop {}x{} has no pixels",
                params.width, params.height
            )));
        }

        let (img, format) = load_image(&params.source)?;
        if params.width > img.width() || params.height > img.height() {
            return Err(BackendError::ProcessingFailed(format!(
                "Crop {}x{} exceeds source {}x{}",
                params.width,
                params.height,
                img.width(),
                img.height()
            )));
        }

        let cropped = img.crop_imm(0, 0, params.width, params.height);
        let bytes = encode(&cropped, format, params.quality, params.resolution)?;
        std::fs::write(&params.output, bytes)?;
        Ok(())
    }
}
