//! Pure calculation functions for crop dimensions.
//!
//! All functions here are pure and testable without any I/O or images. The
//! arithmetic is exact: lengths and resolutions are fixed-point hundredths
//! (see [`crate::measure`]) and every rounding step is half-to-even.

use crate::measure::{CM_PER_INCH_HUNDREDTHS, Centimetres, Dpi, Resolution, round_half_even};

/// Physical length of `pixels` at `dpi`, rounded to 0.01 cm.
///
/// `pixels * 2.54 / dpi`. A zero resolution has no physical size and yields
/// zero.
///
/// # Examples
/// ```
/// # use cropscan::imaging::pixels_to_cm;
/// # use cropscan::measure::{Centimetres, Dpi};
/// // 300 px at 300 dpi is one inch
/// assert_eq!(pixels_to_cm(300, Dpi::from_whole(300)), Centimetres::from_hundredths(254));
/// ```
pub fn pixels_to_cm(pixels: u32, dpi: Dpi) -> Centimetres {
    if dpi == Dpi::ZERO {
        return Centimetres::ZERO;
    }
    // cm = px * (254 / 100) / (dpi_h / 100), in hundredths: px * 254 * 100 / dpi_h
    let numerator = u128::from(pixels) * CM_PER_INCH_HUNDREDTHS * 100;
    let hundredths = round_half_even(numerator, u128::from(dpi.hundredths()));
    Centimetres::from_hundredths(u64::try_from(hundredths).unwrap_or(u64::MAX))
}

/// Pixel count covering `cm` at `dpi`, rounded to the nearest pixel.
///
/// `cm * dpi / 2.54`, saturating at `u32::MAX`.
///
/// # Examples
/// ```
/// # use cropscan::imaging::cm_to_pixels;
/// # use cropscan::measure::{Centimetres, Dpi};
/// // 2 cm at 300 dpi = 236.22 px
/// assert_eq!(cm_to_pixels(Centimetres::from_hundredths(200), Dpi::from_whole(300)), 236);
/// ```
pub fn cm_to_pixels(cm: Centimetres, dpi: Dpi) -> u32 {
    // (cm_h / 100) * (dpi_h / 100) / (254 / 100) = cm_h * dpi_h / (254 * 100)
    let numerator = u128::from(cm.hundredths()) * u128::from(dpi.hundredths());
    let pixels = round_half_even(numerator, CM_PER_INCH_HUNDREDTHS * 100);
    u32::try_from(pixels).unwrap_or(u32::MAX)
}

/// Output size along one axis.
///
/// Without a target the source size is kept. With one, the target is
/// converted to pixels and clamped to the source: this only ever crops.
pub fn output_pixels(source_pixels: u32, dpi: Dpi, target: Option<Centimetres>) -> u32 {
    match target {
        Some(cm) => source_pixels.min(cm_to_pixels(cm, dpi)),
        None => source_pixels,
    }
}

/// Resolution used for conversions: the recorded one, raised per axis to the
/// configured minimum.
pub fn effective_resolution(detected: Resolution, minimum: Resolution) -> Resolution {
    detected.at_least(minimum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dpi(whole: u64) -> Dpi {
        Dpi::from_whole(whole)
    }

    fn cm(hundredths: u64) -> Centimetres {
        Centimetres::from_hundredths(hundredths)
    }

    // =========================================================================
    // pixels_to_cm
    // =========================================================================

    #[test]
    fn pixels_to_cm_one_inch() {
        assert_eq!(pixels_to_cm(300, dpi(300)), cm(254));
        assert_eq!(pixels_to_cm(100, dpi(100)), cm(254));
    }

    #[test]
    fn pixels_to_cm_rounds() {
        // 1000 px at 300 dpi = 8.4666.. cm
        assert_eq!(pixels_to_cm(1000, dpi(300)), cm(847));
        // 800 px at 300 dpi = 6.7733.. cm
        assert_eq!(pixels_to_cm(800, dpi(300)), cm(677));
    }

    #[test]
    fn pixels_to_cm_zero_dpi() {
        assert_eq!(pixels_to_cm(1000, Dpi::ZERO), Centimetres::ZERO);
    }

    // =========================================================================
    // cm_to_pixels
    // =========================================================================

    #[test]
    fn cm_to_pixels_two_cm_at_300() {
        assert_eq!(cm_to_pixels(cm(200), dpi(300)), 236);
    }

    #[test]
    fn cm_to_pixels_exact_inch() {
        assert_eq!(cm_to_pixels(cm(254), dpi(72)), 72);
    }

    #[test]
    fn cm_to_pixels_half_pixel_goes_to_even() {
        // 1.27 cm (half an inch) at 1 dpi = 0.5 px -> 0; at 3 dpi = 1.5 px -> 2
        assert_eq!(cm_to_pixels(cm(127), dpi(1)), 0);
        assert_eq!(cm_to_pixels(cm(127), dpi(3)), 2);
        // 5 dpi = 2.5 px -> 2
        assert_eq!(cm_to_pixels(cm(127), dpi(5)), 2);
    }

    #[test]
    fn cm_to_pixels_fractional_dpi() {
        // 2.54 cm at 299.72 dpi = 299.72 px
        assert_eq!(cm_to_pixels(cm(254), Dpi::from_hundredths(29972)), 300);
    }

    // =========================================================================
    // output_pixels
    // =========================================================================

    #[test]
    fn output_without_target_keeps_source() {
        assert_eq!(output_pixels(800, dpi(300), None), 800);
    }

    #[test]
    fn output_crops_to_target() {
        assert_eq!(output_pixels(1000, dpi(300), Some(cm(200))), 236);
    }

    #[test]
    fn output_never_upscales() {
        // 50 cm at 300 dpi is 5906 px, far more than the source
        assert_eq!(output_pixels(1000, dpi(300), Some(cm(5000))), 1000);
    }

    #[test]
    fn output_never_exceeds_source() {
        for source in [0u32, 1, 99, 236, 1000, 4961] {
            for target in [0u64, 1, 200, 1485, 2970, 100_000] {
                for d in [72u64, 100, 300, 1200] {
                    let out = output_pixels(source, dpi(d), Some(cm(target)));
                    assert!(out <= source, "{source}px {target}cm {d}dpi -> {out}");
                }
            }
        }
    }

    #[test]
    fn round_trip_within_one_pixel() {
        for d in [72u64, 96, 100, 150, 300, 600] {
            for px in (0u32..3000).step_by(7) {
                let back = cm_to_pixels(pixels_to_cm(px, dpi(d)), dpi(d));
                assert!(back.abs_diff(px) <= 1, "{px}px at {d}dpi came back as {back}");
            }
        }
    }

    // =========================================================================
    // effective_resolution
    // =========================================================================

    #[test]
    fn effective_resolution_raises_low_values() {
        let floor = Resolution::uniform(dpi(100));
        assert_eq!(
            effective_resolution(Resolution::uniform(dpi(96)), floor),
            floor
        );
        assert_eq!(effective_resolution(Resolution::UNKNOWN, floor), floor);
    }

    #[test]
    fn effective_resolution_keeps_higher_values() {
        let detected = Resolution::new(dpi(300), dpi(600));
        assert_eq!(
            effective_resolution(detected, Resolution::uniform(dpi(100))),
            detected
        );
    }
}
