//! Length and resolution token parsing.
//!
//! A length token is a decimal number with an optional unit:
//!
//! ```text
//! 14.85            centimetres (no unit)
//! 14.85cm          centimetres
//! 14.85 centimetre / centimetres / centimeter / centimeters
//! 4.5in            inches (unit required)
//! 1 inch / 5 inches
//! ```
//!
//! Matching is case-insensitive and anchored to the whole token. The
//! centimetre form is tried first, then the inch form. Inches are converted at
//! 2.54 cm/in and every result is rounded half-to-even to 0.01 cm (see
//! [`crate::measure`]).

use crate::measure::{Centimetres, Decimal, Dpi};
use regex::Regex;
use std::sync::LazyLock;

const DECIMAL: &str = r"((?:[0-9]*\.)?[0-9]+)";

static CM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^{DECIMAL}\s*(cm|centimetre|centimetres|centimeter|centimeters)?$"
    ))
    .expect("centimetre pattern is valid")
});

static IN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^{DECIMAL}\s*(in|inch|inches)$")).expect("inch pattern is valid")
});

static PLAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*{DECIMAL}\s*$")).expect("decimal pattern is valid")
});

/// Parse a length token into centimetres.
///
/// Returns `None` when the token matches neither form; whether that is a
/// problem is up to the caller.
pub fn parse_length(token: &str) -> Option<Centimetres> {
    if let Some(number) = capture_number(&CM_PATTERN, token) {
        return Centimetres::from_cm(number);
    }
    capture_number(&IN_PATTERN, token).and_then(Centimetres::from_inches)
}

/// Parse a plain resolution value (`300`, `72.5`). No units are accepted.
pub fn parse_resolution(token: &str) -> Option<Dpi> {
    capture_number(&PLAIN_PATTERN, token).and_then(Dpi::from_decimal)
}

fn capture_number(pattern: &Regex, token: &str) -> Option<Decimal> {
    let captures = pattern.captures(token)?;
    Decimal::parse(captures.get(1)?.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cm(hundredths: u64) -> Option<Centimetres> {
        Some(Centimetres::from_hundredths(hundredths))
    }

    #[test]
    fn centimetre_spellings() {
        for token in [
            "14.85",
            "14.85cm",
            "14.85 cm",
            "14.85  cm",
            "14.85 centimetre",
            "14.85 centimeter",
            "14.85 centimetres",
            "14.85 centimeters",
            "14.85CM",
            "14.85 Centimetres",
        ] {
            assert_eq!(parse_length(token), cm(1485), "token {token:?}");
        }
    }

    #[test]
    fn inch_spellings() {
        assert_eq!(parse_length("4.5 in"), cm(1143));
        assert_eq!(parse_length("1.0 inch"), cm(254));
        assert_eq!(parse_length("5 inches"), cm(1270));
        assert_eq!(parse_length("2.85in"), cm(724));
        assert_eq!(parse_length("2.6in"), cm(660));
        assert_eq!(parse_length("2.6IN"), cm(660));
    }

    #[test]
    fn bare_numbers_are_centimetres() {
        assert_eq!(parse_length("10"), cm(1000));
        assert_eq!(parse_length(".25"), cm(25));
    }

    #[test]
    fn rounding_is_half_even() {
        assert_eq!(parse_length("1.005"), cm(100));
        assert_eq!(parse_length("1.015"), cm(102));
        // 0.25in = 0.635cm
        assert_eq!(parse_length("0.25in"), cm(64));
        // 0.75in = 1.905cm
        assert_eq!(parse_length("0.75in"), cm(190));
    }

    #[test]
    fn malformed_tokens_have_no_value() {
        for token in [
            "", "cm", "in", "abc", "10 mm", "10 feet", "1.", "1..2", " 10cm", "10cm ", "10 c m",
            "-5cm", "10 inchs", "x10",
        ] {
            assert_eq!(parse_length(token), None, "token {token:?}");
        }
    }

    #[test]
    fn unicode_digits_are_rejected() {
        assert_eq!(parse_length("١٠cm"), None);
    }

    #[test]
    fn resolution_is_plain_decimal() {
        assert_eq!(parse_resolution("300"), Some(Dpi::from_whole(300)));
        assert_eq!(parse_resolution("72.5"), Some(Dpi::from_hundredths(7250)));
        assert_eq!(parse_resolution(" 150 "), Some(Dpi::from_whole(150)));
        assert_eq!(parse_resolution("0"), Some(Dpi::ZERO));
        assert_eq!(parse_resolution("300dpi"), None);
        assert_eq!(parse_resolution("high"), None);
        assert_eq!(parse_resolution(""), None);
    }
}
