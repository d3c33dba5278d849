//! Usage faults and the accumulator that collects them.
//!
//! Malformed arguments and violated configuration invariants are not errors
//! in the `Result` sense: parsing keeps going so the user sees every problem
//! in one run. Each problem becomes a [`Fault`] whose `Display` output is the
//! exact message printed under the usage text.

use crate::measure::Dpi;
use std::fmt;
use thiserror::Error;

/// The target dimension a length argument was meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => f.write_str("Width"),
            Axis::Height => f.write_str("Height"),
        }
    }
}

/// A recoverable, user-facing problem with the command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("Invalid option specified - \"{0}\"")]
    InvalidOption(String),
    #[error("{axis} parameter is not in the correct format - \"{token}\"")]
    InvalidLength { axis: Axis, token: String },
    #[error("Resolution parameter is not in the correct format - \"{0}\"")]
    InvalidResolution(String),
    #[error("Option \"{0}\" requires a value")]
    MissingValue(String),
    #[error("At least the cropped Width or Height must be specified.")]
    MissingDimension,
    #[error("The minimum resolution is {0}dpi.")]
    ResolutionBelowFloor(Dpi),
    #[error("At least one file specification must be given.")]
    MissingSearchSpec,
    /// Last resort for a failure nobody anticipated; carries the raw message.
    #[error("{0}")]
    Unexpected(String),
}

/// A value together with every fault found while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    value: T,
    faults: Vec<Fault>,
}

impl<T> Validated<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            faults: Vec::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn push(&mut self, fault: Fault) {
        self.faults.push(fault);
    }

    pub fn extend(&mut self, faults: impl IntoIterator<Item = Fault>) {
        self.faults.extend(faults);
    }

    /// True iff at least one fault was recorded.
    pub fn is_faulted(&self) -> bool {
        !self.faults.is_empty()
    }

    pub fn into_parts(self) -> (T, Vec<Fault>) {
        (self.value, self.faults)
    }

    /// The value if nothing went wrong, otherwise all faults in the order
    /// they were found.
    pub fn into_result(self) -> Result<T, Vec<Fault>> {
        if self.faults.is_empty() {
            Ok(self.value)
        } else {
            Err(self.faults)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_quote_the_offending_token() {
        assert_eq!(
            Fault::InvalidOption("-x".into()).to_string(),
            "Invalid option specified - \"-x\""
        );
        assert_eq!(
            Fault::InvalidLength {
                axis: Axis::Height,
                token: "tall".into()
            }
            .to_string(),
            "Height parameter is not in the correct format - \"tall\""
        );
        assert_eq!(
            Fault::ResolutionBelowFloor(Dpi::from_whole(72)).to_string(),
            "The minimum resolution is 72dpi."
        );
    }

    #[test]
    fn new_is_not_faulted() {
        let v = Validated::new(5);
        assert!(!v.is_faulted());
        assert_eq!(v.into_result(), Ok(5));
    }

    #[test]
    fn faults_accumulate_in_order() {
        let mut v = Validated::new(());
        v.push(Fault::MissingDimension);
        v.extend([Fault::MissingSearchSpec]);
        assert!(v.is_faulted());
        assert_eq!(
            v.into_result(),
            Err(vec![Fault::MissingDimension, Fault::MissingSearchSpec])
        );
    }
}
