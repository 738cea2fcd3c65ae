//! Run configuration, resolved once before execution.

use crate::constants::{Address, DEFAULT_START};

/// Environment variable enabling the trace sink
pub const TRACE_VAR: &str = "DEBUG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Initial value of the control register and the accumulator
    pub start: Address,

    /// Record every step on stderr
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            trace: false,
        }
    }
}

impl Config {
    /// Read the configuration from the environment
    #[must_use]
    pub fn from_env() -> Self {
        let trace = std::env::var(TRACE_VAR)
            .map(|value| parse_toggle(&value))
            .unwrap_or(false);

        Self {
            trace,
            ..Self::default()
        }
    }
}

/// Interpret a boolean-ish environment value.
///
/// A leading nonzero integer enables the toggle, as do `true`, `yes` and
/// `on`. Anything else disables it.
#[must_use]
pub fn parse_toggle(value: &str) -> bool {
    let value = value.trim();
    if ["true", "yes", "on"]
        .iter()
        .any(|word| value.eq_ignore_ascii_case(word))
    {
        return true;
    }

    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    digits
        .chars()
        .take_while(char::is_ascii_digit)
        .any(|c| c != '0')
}
