//! Run configuration.
//!
//! There are no configuration files and no environment variables: a [`Config`]
//! starts from the defaults below and is populated from the command line by
//! [`crate::options`]. After [`validate`] it is never modified again; every
//! later stage borrows it read-only.
//!
//! ## Options and defaults
//!
//! ```text
//! show_help        false      -? / --help
//! what_if          false      -wi / --whatif      report only, write nothing
//! width            (none)     -w / --width LEN    keep source width when unset
//! height           (none)     -h / --height LEN   keep source height when unset
//! min_resolution   100x100    -r / --resolution   sets both axes
//! suffix           ""         -s / --suffix STR   empty overwrites in place
//! search_specs     []         SPEC [SPEC ...]     also split on ';'
//! quality          90         JPEG output quality (not settable)
//! ```
//!
//! ## Invariants
//!
//! Checked once, after parsing, each reported independently:
//!
//! - at least one of `width` / `height` is set
//! - both `min_resolution` axes are at least [`MIN_ALLOWED_RESOLUTION`]
//! - at least one search specification was given

use crate::fault::{Fault, Validated};
use crate::imaging::Quality;
use crate::measure::{Centimetres, Dpi, Resolution};
use crate::options;

/// Resolution assumed for images that record less (or nothing).
pub const DEFAULT_MIN_RESOLUTION: Dpi = Dpi::from_whole(100);

/// Lowest value `-r` may set.
pub const MIN_ALLOWED_RESOLUTION: Dpi = Dpi::from_whole(72);

/// Everything a run needs to know, taken from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub show_help: bool,
    pub what_if: bool,
    pub width: Option<Centimetres>,
    pub height: Option<Centimetres>,
    /// Floor applied per axis to each image's recorded resolution.
    pub min_resolution: Resolution,
    /// Appended to the file stem of the output; empty means overwrite.
    pub suffix: String,
    /// Glob patterns or literal paths, in command-line order.
    pub search_specs: Vec<String>,
    pub quality: Quality,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_help: false,
            what_if: false,
            width: None,
            height: None,
            min_resolution: Resolution::uniform(DEFAULT_MIN_RESOLUTION),
            suffix: String::new(),
            search_specs: Vec::new(),
            quality: Quality::default(),
        }
    }
}

impl Config {
    /// Add search specifications from one argument; `;` separates several.
    pub fn add_search_specs(&mut self, arg: &str) {
        self.search_specs.extend(
            arg.split(';')
                .filter(|spec| !spec.is_empty())
                .map(str::to_string),
        );
    }
}

/// Check the post-parse invariants. Returns one fault per violated invariant.
pub fn validate(config: &Config) -> Vec<Fault> {
    let mut faults = Vec::new();
    if config.width.is_none() && config.height.is_none() {
        faults.push(Fault::MissingDimension);
    }
    if config.min_resolution.x < MIN_ALLOWED_RESOLUTION
        || config.min_resolution.y < MIN_ALLOWED_RESOLUTION
    {
        faults.push(Fault::ResolutionBelowFloor(MIN_ALLOWED_RESOLUTION));
    }
    if config.search_specs.is_empty() {
        faults.push(Fault::MissingSearchSpec);
    }
    faults
}

/// Parse the argument list and validate the result.
///
/// Validation runs even when parsing already faulted, so every problem is
/// reported together.
pub fn from_args<I, S>(args: I) -> Validated<Config>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = options::parse_args(args);
    let faults = validate(parsed.value());
    parsed.extend(faults);
    parsed
}
