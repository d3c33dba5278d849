//! Command-line option parsing.
//!
//! The argument list is consumed left to right by a small state machine.
//! Flags that take a value move it into an `Expect*` state; the next token is
//! the value and the machine returns to [`State::ExpectOption`].
//!
//! | short | long | effect | next state |
//! |---|---|---|---|
//! | `-?` | `--help` | show usage | `ExpectOption` |
//! | `-wi` | `--whatif` | dry run | `ExpectOption` |
//! | `-w` | `--width` | | `ExpectWidth` |
//! | `-h` | `--height` | | `ExpectHeight` |
//! | `-s` | `--suffix` | | `ExpectSuffix` |
//! | `-r` | `--resolution` | | `ExpectResolution` |
//!
//! Short flags may also start with `/` and all flags are case-insensitive.
//! Anything that is not a flag is a search specification. Problems never stop
//! the parse: each becomes a [`Fault`] in the returned [`Validated`].

use crate::config::Config;
use crate::fault::{Axis, Fault, Validated};
use crate::length::{parse_length, parse_resolution};
use crate::measure::Resolution;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Parser state. Value-expecting states remember the flag that entered them
/// so a missing value can be reported by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    ExpectOption,
    ExpectWidth(String),
    ExpectHeight(String),
    ExpectSuffix(String),
    ExpectResolution(String),
}

impl State {
    /// The flag still waiting for its value, if any.
    fn pending_flag(&self) -> Option<&str> {
        match self {
            State::ExpectOption => None,
            State::ExpectWidth(flag)
            | State::ExpectHeight(flag)
            | State::ExpectSuffix(flag)
            | State::ExpectResolution(flag) => Some(flag),
        }
    }
}

/// Parse an argument list (without the program name) into a [`Config`].
///
/// Never panics: an unexpected panic inside the parse is caught and recorded
/// as a single [`Fault::Unexpected`].
pub fn parse_args<I, S>(args: I) -> Validated<Config>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = Validated::new(Config::default());
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut state = State::ExpectOption;
        for arg in args {
            state = transition(state, arg.as_ref(), &mut parsed);
        }
        if let Some(flag) = state.pending_flag() {
            parsed.push(Fault::MissingValue(flag.to_string()));
        }
    }));
    if let Err(payload) = outcome {
        parsed.push(Fault::Unexpected(panic_message(payload.as_ref())));
    }
    parsed
}

/// Advance the machine by one token.
///
/// The only side effects are on `parsed`: a config field is set or a fault
/// is appended.
pub fn transition(state: State, token: &str, parsed: &mut Validated<Config>) -> State {
    // An empty suffix is meaningful (overwrite in place); any other empty
    // token is ignored.
    if token.is_empty() && !matches!(state, State::ExpectSuffix(_)) {
        return state;
    }

    match state {
        State::ExpectOption => expect_option(token, parsed),
        State::ExpectWidth(_) => {
            set_length(Axis::Width, token, parsed);
            State::ExpectOption
        }
        State::ExpectHeight(_) => {
            set_length(Axis::Height, token, parsed);
            State::ExpectOption
        }
        State::ExpectSuffix(_) => {
            parsed.value_mut().suffix = token.to_string();
            State::ExpectOption
        }
        State::ExpectResolution(_) => {
            match parse_resolution(token) {
                Some(dpi) => parsed.value_mut().min_resolution = Resolution::uniform(dpi),
                None => parsed.push(Fault::InvalidResolution(token.to_string())),
            }
            State::ExpectOption
        }
    }
}

fn expect_option(token: &str, parsed: &mut Validated<Config>) -> State {
    if let Some(name) = token.strip_prefix("--") {
        long_option(name, token, parsed)
    } else if let Some(name) = token.strip_prefix('-') {
        short_option(name, token, parsed)
    } else if let Some(name) = token.strip_prefix('/') {
        if is_path_like(name) {
            parsed.value_mut().add_search_specs(token);
            State::ExpectOption
        } else {
            short_option(name, token, parsed)
        }
    } else {
        parsed.value_mut().add_search_specs(token);
        State::ExpectOption
    }
}

/// A `/`-prefixed token that is clearly an absolute path or pattern rather
/// than a flag (`/scans/*.jpg`, `/*.png`).
fn is_path_like(rest: &str) -> bool {
    rest.contains(['/', '*', '['])
}

fn short_option(name: &str, token: &str, parsed: &mut Validated<Config>) -> State {
    let flag = token.to_string();
    match name.to_lowercase().as_str() {
        "?" => {
            parsed.value_mut().show_help = true;
            State::ExpectOption
        }
        "wi" => {
            parsed.value_mut().what_if = true;
            State::ExpectOption
        }
        "w" => State::ExpectWidth(flag),
        "h" => State::ExpectHeight(flag),
        "s" => State::ExpectSuffix(flag),
        "r" => State::ExpectResolution(flag),
        _ => invalid(token, parsed),
    }
}

fn long_option(name: &str, token: &str, parsed: &mut Validated<Config>) -> State {
    let flag = token.to_string();
    match name.to_lowercase().as_str() {
        "help" => {
            parsed.value_mut().show_help = true;
            State::ExpectOption
        }
        "whatif" => {
            parsed.value_mut().what_if = true;
            State::ExpectOption
        }
        "width" => State::ExpectWidth(flag),
        "height" => State::ExpectHeight(flag),
        "suffix" => State::ExpectSuffix(flag),
        "resolution" => State::ExpectResolution(flag),
        _ => invalid(token, parsed),
    }
}

fn invalid(token: &str, parsed: &mut Validated<Config>) -> State {
    parsed.push(Fault::InvalidOption(token.to_string()));
    State::ExpectOption
}

fn set_length(axis: Axis, token: &str, parsed: &mut Validated<Config>) {
    match parse_length(token) {
        Some(length) => {
            let config = parsed.value_mut();
            match axis {
                Axis::Width => config.width = Some(length),
                Axis::Height => config.height = Some(length),
            }
        }
        None => parsed.push(Fault::InvalidLength {
            axis,
            token: token.to_string(),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected failure while reading arguments".to_string()
    }
}
