//! Minimal resolution (pixel density) reader for JPEG, PNG and TIFF files.
//!
//! The `image` crate decodes pixels but does not report how many of them make
//! an inch, so this module reads the density straight from the file headers:
//!
//! | Format | Source | Units |
//! |---|---|---|
//! | JPEG | JFIF APP0 `Xdensity`/`Ydensity` | dots per inch or per cm |
//! | JPEG | EXIF APP1, IFD0 tags 282/283/296 | as TIFF |
//! | TIFF | IFD0 `XResolution` (282), `YResolution` (283), `ResolutionUnit` (296) | inch (default) or cm |
//! | PNG | `pHYs` chunk | dots per metre |
//!
//! The format is sniffed from the leading bytes, not the extension. Anything
//! that cannot be read yields [`Resolution::UNKNOWN`]; the caller substitutes
//! its configured minimum.

use crate::measure::{Dpi, Resolution};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tiff::decoder::Decoder;
use tiff::decoder::ifd::Value;
use tiff::tags::Tag;

/// Bytes read from the start of a JPEG or PNG. Covers a full-size APP0 plus
/// APP1 segment, and PNG writers put `pHYs` right after `IHDR`.
const HEADER_PREFIX: u64 = 128 * 1024;

/// Read the recorded resolution of an image file.
/// Returns [`Resolution::UNKNOWN`] on any read or parse failure.
///
/// TIFF directories may sit anywhere in the file (the `tiff` encoder writes
/// them after the strips), so TIFF files go through the `tiff` decoder, which
/// seeks to IFD0. Everything else is parsed from a bounded prefix.
pub fn read_resolution(path: &Path) -> Resolution {
    read_file(path).unwrap_or(Resolution::UNKNOWN)
}

fn read_file(path: &Path) -> Option<Resolution> {
    let mut file = File::open(path).ok()?;
    let mut prefix = Vec::new();
    (&mut file).take(HEADER_PREFIX).read_to_end(&mut prefix).ok()?;

    if is_tiff(&prefix) {
        file.seek(SeekFrom::Start(0)).ok()?;
        return read_tiff_file(BufReader::new(file));
    }
    Some(resolution_from_bytes(&prefix))
}

fn is_tiff(data: &[u8]) -> bool {
    data.starts_with(b"II*\0") || data.starts_with(b"MM\0*")
}

/// IFD0 resolution tags through the `tiff` decoder.
fn read_tiff_file<R: Read + Seek>(reader: R) -> Option<Resolution> {
    let mut decoder = Decoder::new(reader).ok()?;
    let rational = |value: Option<Value>| match value {
        Some(Value::Rational(n, d)) => Some((u64::from(n), u64::from(d))),
        _ => None,
    };
    let x = rational(decoder.find_tag(Tag::XResolution).ok()?)?;
    let y = rational(decoder.find_tag(Tag::YResolution).ok()?)?;
    let unit = decoder
        .find_tag_unsigned::<u16>(Tag::ResolutionUnit)
        .ok()?
        .unwrap_or(UNIT_INCH);
    from_rationals(x, y, unit)
}

/// Dispatch on the file signature.
pub fn resolution_from_bytes(data: &[u8]) -> Resolution {
    let found = if data.starts_with(&[0xFF, 0xD8]) {
        read_jpeg(data)
    } else if data.starts_with(PNG_SIGNATURE) {
        read_png(data)
    } else if is_tiff(data) {
        read_tiff(data)
    } else {
        None
    };
    found.unwrap_or(Resolution::UNKNOWN)
}

// ---------------------------------------------------------------------------
// JPEG: JFIF APP0 first, EXIF APP1 as fallback
// ---------------------------------------------------------------------------

const JFIF_HEADER: &[u8] = b"JFIF\0";
const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Walk the JPEG marker segments up to the start of scan.
///
/// JFIF density wins when it carries real units; a JFIF header with unit 0
/// only records an aspect ratio, so EXIF is consulted instead.
fn read_jpeg(data: &[u8]) -> Option<Resolution> {
    let mut exif = None;
    let mut pos = 2;

    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return exif;
        }
        let marker = data[pos + 1];
        // Fill bytes
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // Start of scan: compressed data follows
        if marker == 0xDA || marker == 0xD9 {
            break;
        }
        // Markers without a length field
        if (0xD0..=0xD7).contains(&marker) || marker == 0x01 {
            pos += 2;
            continue;
        }

        let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if seg_len < 2 {
            break;
        }
        let seg_start = pos + 4;
        let seg_end = (pos + 2 + seg_len).min(data.len());
        let segment = &data[seg_start..seg_end];

        match marker {
            0xE0 if segment.starts_with(JFIF_HEADER) => {
                if let Some(found) = read_jfif(segment) {
                    return Some(found);
                }
            }
            0xE1 if segment.starts_with(EXIF_HEADER) && exif.is_none() => {
                exif = read_tiff(&segment[EXIF_HEADER.len()..]);
            }
            _ => {}
        }

        pos += 2 + seg_len;
    }
    exif
}

/// JFIF APP0 layout after the identifier: version (2), units (1),
/// Xdensity (2), Ydensity (2).
fn read_jfif(segment: &[u8]) -> Option<Resolution> {
    let body = segment.get(JFIF_HEADER.len()..)?;
    if body.len() < 7 {
        return None;
    }
    let units = body[2];
    let x = u64::from(u16::from_be_bytes([body[3], body[4]]));
    let y = u64::from(u16::from_be_bytes([body[5], body[6]]));
    if x == 0 || y == 0 {
        return None;
    }
    match units {
        1 => Some(Resolution::new(Dpi::from_whole(x), Dpi::from_whole(y))),
        2 => Some(Resolution::new(
            Dpi::from_dots_per_cm(x, 1)?,
            Dpi::from_dots_per_cm(y, 1)?,
        )),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// TIFF (and EXIF, which is a TIFF structure)
// ---------------------------------------------------------------------------

const TAG_X_RESOLUTION: u16 = 282;
const TAG_Y_RESOLUTION: u16 = 283;
const TAG_RESOLUTION_UNIT: u16 = 296;

const TYPE_SHORT: u16 = 3;
const TYPE_RATIONAL: u16 = 5;

const UNIT_INCH: u16 = 2;
const UNIT_CM: u16 = 3;

/// Read `XResolution`/`YResolution` from IFD0.
///
/// A missing `ResolutionUnit` means inches, per the TIFF spec. Unit 1 ("no
/// absolute unit") gives no usable density.
fn read_tiff(data: &[u8]) -> Option<Resolution> {
    if data.len() < 8 {
        return None;
    }

    let big_endian = match &data[0..2] {
        b"MM" => true,
        b"II" => false,
        _ => return None,
    };

    let read_u16 = |offset: usize| -> Option<u16> {
        let bytes = [*data.get(offset)?, *data.get(offset + 1)?];
        Some(if big_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        })
    };

    let read_u32 = |offset: usize| -> Option<u32> {
        let bytes = [
            *data.get(offset)?,
            *data.get(offset + 1)?,
            *data.get(offset + 2)?,
            *data.get(offset + 3)?,
        ];
        Some(if big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        })
    };

    // TIFF magic
    if read_u16(2)? != 42 {
        return None;
    }

    let ifd_offset = read_u32(4)? as usize;
    let entry_count = read_u16(ifd_offset)? as usize;
    let entries_start = ifd_offset + 2;

    let mut x_res = None;
    let mut y_res = None;
    let mut unit = UNIT_INCH;

    for i in 0..entry_count {
        let entry = entries_start + i * 12;
        let tag = read_u16(entry)?;
        let typ = read_u16(entry + 2)?;

        match (tag, typ) {
            (TAG_X_RESOLUTION | TAG_Y_RESOLUTION, TYPE_RATIONAL) => {
                // RATIONAL is 8 bytes, so the value field holds an offset
                let value_offset = read_u32(entry + 8)? as usize;
                let numerator = read_u32(value_offset)?;
                let denominator = read_u32(value_offset + 4)?;
                let rational = (u64::from(numerator), u64::from(denominator));
                if tag == TAG_X_RESOLUTION {
                    x_res = Some(rational);
                } else {
                    y_res = Some(rational);
                }
            }
            (TAG_RESOLUTION_UNIT, TYPE_SHORT) => {
                // SHORT values are stored inline, left-justified
                unit = read_u16(entry + 8)?;
            }
            _ => {}
        }
    }

    from_rationals(x_res?, y_res?, unit)
}

/// Resolution from TIFF `XResolution`/`YResolution` rationals in `unit`.
fn from_rationals(
    (x_num, x_den): (u64, u64),
    (y_num, y_den): (u64, u64),
    unit: u16,
) -> Option<Resolution> {
    let (x, y) = match unit {
        UNIT_INCH => (Dpi::from_ratio(x_num, x_den)?, Dpi::from_ratio(y_num, y_den)?),
        UNIT_CM => (
            Dpi::from_dots_per_cm(x_num, x_den)?,
            Dpi::from_dots_per_cm(y_num, y_den)?,
        ),
        _ => return None,
    };
    if x == Dpi::ZERO || y == Dpi::ZERO {
        return None;
    }
    Some(Resolution::new(x, y))
}

// ---------------------------------------------------------------------------
// PNG: pHYs chunk
// ---------------------------------------------------------------------------

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const PHYS_UNIT_METRE: u8 = 1;

/// Scan chunks for `pHYs`, which must precede the first `IDAT`.
fn read_png(data: &[u8]) -> Option<Resolution> {
    let mut pos = PNG_SIGNATURE.len();

    while pos + 8 <= data.len() {
        let length =
            u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]) as usize;
        let kind = &data[pos + 4..pos + 8];
        let body_start = pos + 8;
        let body = data.get(body_start..body_start.checked_add(length)?)?;

        match kind {
            b"pHYs" if body.len() >= 9 => {
                if body[8] != PHYS_UNIT_METRE {
                    return None;
                }
                let x = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
                let y = u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
                if x == 0 || y == 0 {
                    return None;
                }
                return Some(Resolution::new(
                    Dpi::from_dots_per_metre(u64::from(x)),
                    Dpi::from_dots_per_metre(u64::from(y)),
                ));
            }
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }

        // length + type + body + CRC
        pos = body_start + length + 4;
    }
    None
}
