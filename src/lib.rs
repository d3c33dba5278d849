//! # cropscan
//!
//! Batch-crops scanned images to a physical size. Give it a width and/or a
//! height in centimetres or inches plus some file patterns; for every matching
//! image it works out how many pixels that length covers at the image's
//! resolution and keeps that much of the top-left corner.
//!
//! ```text
//! cropscan -w 21cm -h 14.85cm -s -a5 scans/*.jpg
//! ```
//!
//! # Pipeline
//!
//! ```text
//! args ─► options (state machine) ─► Config + faults ─► config::validate
//!                                                          │
//!                      faults? ─► usage + faults, exit 1 ◄─┤
//!                                                          ▼
//!          scan (specs → files) ─► process (identify → plan → crop) ─► output
//! ```
//!
//! Nothing touches the filesystem until the whole command line is known to be
//! good. After that each file stands alone: a file that cannot be read or
//! written is reported and the batch carries on.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`options`] | Argument state machine producing a [`config::Config`] and [`fault::Fault`]s |
//! | [`length`] | `14.85cm` / `4.5 in` / `300` parsing |
//! | [`measure`] | Exact fixed-point lengths and resolutions (hundredths, half-to-even rounding) |
//! | [`config`] | Run configuration, defaults and post-parse validation |
//! | [`fault`] | Usage faults and the `Validated<T>` accumulator |
//! | [`scan`] | Search specification → directory + glob → file list |
//! | [`naming`] | Output path derivation (suffix before the extension) |
//! | [`process`] | Per-file crop planning and the batch loop |
//! | [`imaging`] | Length/pixel math, resolution reading, `image`-crate backend |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Exact Arithmetic
//!
//! Lengths and resolutions are integers counting hundredths, and every division
//! rounds half-to-even. `1.005cm` is always `1.00cm`, and the same
//! command on the same file always yields the same pixel count on every
//! platform.
//!
//! ## Faults Are Collected, Not Thrown
//!
//! A bad argument does not stop parsing. Every problem with the command line
//! is gathered into one list and shown under the usage text, so a user fixes
//! them all in one go.
//!
//! ## Crop Only
//!
//! The output is never larger than the source on either axis. A target longer
//! than the image leaves that axis alone; a file already within both targets is
//! not rewritten at all.

pub mod config;
pub mod fault;
pub mod imaging;
pub mod length;
pub mod measure;
pub mod naming;
pub mod options;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
