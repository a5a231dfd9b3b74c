// Parse configuration

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::strategy::Strategy;

/// Column count used when none is configured.
pub const DEFAULT_ARITY: usize = 7;

/// What to do with a data line whose field count differs from the arity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Stop the parse with `Error::ArityMismatch`.
    #[default]
    Abort,
    /// Drop the line, log it, and list it in the report.
    Skip,
}

impl MalformedPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            MalformedPolicy::Abort => "abort",
            MalformedPolicy::Skip => "skip",
        }
    }
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(MalformedPolicy::Abort),
            "skip" => Ok(MalformedPolicy::Skip),
            other => Err(format!(
                "unknown malformed-line policy `{other}` (expected `abort` or `skip`)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Fields per line, header included.
    pub arity: usize,
    pub strategy: Strategy,
    pub on_malformed: MalformedPolicy,
    /// Scan every data line with both strategies and fail on disagreement.
    pub verify: bool,
}

impl ParseConfig {
    pub fn new(arity: usize) -> Result<Self> {
        if arity == 0 {
            return Err(Error::InvalidArity(arity));
        }
        Ok(ParseConfig {
            arity,
            strategy: Strategy::default(),
            on_malformed: MalformedPolicy::default(),
            verify: false,
        })
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_on_malformed(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            arity: DEFAULT_ARITY,
            strategy: Strategy::default(),
            on_malformed: MalformedPolicy::default(),
            verify: false,
        }
    }
}
