//! Fixed-point measurement types.
//!
//! Lengths and resolutions are stored as integer hundredths, so parsing,
//! unit conversion and rounding are exact decimal operations rather than
//! binary floating point. Every rounding step in the crate goes through
//! [`round_half_even`]: a value exactly halfway between two candidates rounds
//! to the even one (`2.345 → 2.34`, `2.355 → 2.36`, `236.5 → 236`).
//!
//! | Type | Unit | Example |
//! |---|---|---|
//! | [`Centimetres`] | hundredths of a centimetre | `14.85cm` → `1485` |
//! | [`Dpi`] | hundredths of a dot per inch | `300dpi` → `30000` |
//! | [`Resolution`] | a horizontal and a vertical [`Dpi`] | `300x300` |

use std::fmt;

/// Centimetres per inch, in hundredths.
pub const CM_PER_INCH_HUNDREDTHS: u128 = 254;

/// Divide and round the quotient half-to-even.
///
/// `denominator` must be non-zero.
pub fn round_half_even(numerator: u128, denominator: u128) -> u128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let twice = remainder * 2;
    if twice > denominator || (twice == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// An unsigned decimal literal, kept as `mantissa / 10^scale`.
///
/// Accepts the grammar `(\d*\.)?\d+` with ASCII digits only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    mantissa: u128,
    scale: u32,
}

impl Decimal {
    /// Parse a decimal literal. Returns `None` on any other input or when the
    /// digits overflow the mantissa.
    pub fn parse(text: &str) -> Option<Self> {
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => ("", text),
        };
        if fraction.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let mut mantissa: u128 = 0;
        for b in whole.bytes().chain(fraction.bytes()) {
            mantissa = mantissa
                .checked_mul(10)?
                .checked_add(u128::from(b - b'0'))?;
        }
        let scale = if text.contains('.') {
            u32::try_from(fraction.len()).ok()?
        } else {
            0
        };
        // 10^scale has to fit as well
        10u128.checked_pow(scale)?;
        Some(Self { mantissa, scale })
    }

    /// Multiply by `factor / 100` and round to hundredths.
    fn scaled_hundredths(self, factor_hundredths: u128) -> Option<u64> {
        let numerator = self.mantissa.checked_mul(factor_hundredths)?;
        let rounded = round_half_even(numerator, 10u128.pow(self.scale));
        u64::try_from(rounded).ok()
    }
}

/// A length in centimetres, rounded to two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Centimetres(u64);

impl Centimetres {
    pub const ZERO: Self = Self(0);

    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    pub const fn hundredths(self) -> u64 {
        self.0
    }

    /// A centimetre literal, rounded to hundredths.
    pub fn from_cm(value: Decimal) -> Option<Self> {
        value.scaled_hundredths(100).map(Self)
    }

    /// An inch literal converted at 2.54 cm/in, rounded to hundredths.
    pub fn from_inches(value: Decimal) -> Option<Self> {
        value
            .scaled_hundredths(CM_PER_INCH_HUNDREDTHS)
            .map(Self)
    }
}

impl fmt::Display for Centimetres {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Dots per inch, rounded to two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dpi(u64);

impl Dpi {
    /// "No usable resolution recorded."
    pub const ZERO: Self = Self(0);

    pub const fn from_whole(dpi: u64) -> Self {
        Self(dpi * 100)
    }

    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    pub const fn hundredths(self) -> u64 {
        self.0
    }

    /// A plain decimal literal, rounded to hundredths.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        value.scaled_hundredths(100).map(Self)
    }

    /// `numerator / denominator` dpi, as stored in TIFF/EXIF rationals.
    pub fn from_ratio(numerator: u64, denominator: u64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let hundredths =
            round_half_even(u128::from(numerator) * 100, u128::from(denominator));
        u64::try_from(hundredths).ok().map(Self)
    }

    /// `numerator / denominator` dots per centimetre.
    pub fn from_dots_per_cm(numerator: u64, denominator: u64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let hundredths = round_half_even(
            u128::from(numerator) * CM_PER_INCH_HUNDREDTHS,
            u128::from(denominator),
        );
        u64::try_from(hundredths).ok().map(Self)
    }

    /// Dots per metre, as stored in PNG `pHYs` chunks.
    pub fn from_dots_per_metre(dots: u64) -> Self {
        // dpi = dots * 0.0254, so hundredths = dots * 254 / 100
        let hundredths = round_half_even(u128::from(dots) * CM_PER_INCH_HUNDREDTHS, 100);
        Self(u64::try_from(hundredths).unwrap_or(u64::MAX))
    }

    /// Nearest whole dots per metre, for PNG `pHYs`.
    pub fn to_dots_per_metre(self) -> u32 {
        let dots = round_half_even(u128::from(self.0) * 100, CM_PER_INCH_HUNDREDTHS);
        u32::try_from(dots).unwrap_or(u32::MAX)
    }

    /// Nearest whole dpi, saturated to `u16` for file headers.
    pub fn to_whole_u16(self) -> u16 {
        let whole = round_half_even(u128::from(self.0), 100);
        u16::try_from(whole).unwrap_or(u16::MAX)
    }
}

impl fmt::Display for Dpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        match self.0 % 100 {
            0 => write!(f, "{whole}"),
            frac if frac % 10 == 0 => write!(f, "{whole}.{}", frac / 10),
            frac => write!(f, "{whole}.{frac:02}"),
        }
    }
}

/// Horizontal and vertical resolution of an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub x: Dpi,
    pub y: Dpi,
}

impl Resolution {
    pub const UNKNOWN: Self = Self::uniform(Dpi::ZERO);

    pub const fn new(x: Dpi, y: Dpi) -> Self {
        Self { x, y }
    }

    pub const fn uniform(dpi: Dpi) -> Self {
        Self { x: dpi, y: dpi }
    }

    /// Per-axis maximum against a floor.
    pub fn at_least(self, floor: Resolution) -> Self {
        Self {
            x: self.x.max(floor.x),
            y: self.y.max(floor.y),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}dpi", self.x, self.y)
    }
}
