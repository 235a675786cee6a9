use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::core::{Channel, Error, Span};

/// Whether a parameter may be written as well as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessControl {
    ReadWrite,
    ReadOnly,
}

/// One of the named, per-channel parameters exposed by a D5a.
///
/// Registered names are `dacN`, `stepsizeN` and `spanN` for `N` in `1..=16`.
/// Parsing a name yields a typed identifier; nothing is dispatched on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Output voltage, in volts.
    Dac(Channel),
    /// Minimum voltage increment for the current span, in volts.
    Stepsize(Channel),
    Span(Channel),
}

impl Parameter {
    /// All 48 parameters, grouped per channel in registration order.
    pub fn all() -> impl Iterator<Item = Parameter> {
        Channel::all().flat_map(|channel| {
            [
                Parameter::Dac(channel),
                Parameter::Stepsize(channel),
                Parameter::Span(channel),
            ]
        })
    }

    pub fn channel(&self) -> Channel {
        match *self {
            Parameter::Dac(channel) | Parameter::Stepsize(channel) | Parameter::Span(channel) => {
                channel
            }
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Parameter::Dac(_) => "dac",
            Parameter::Stepsize(_) => "stepsize",
            Parameter::Span(_) => "span",
        }
    }

    pub fn name(&self) -> String {
        format!("{}{}", self.prefix(), self.channel())
    }

    pub fn label(&self) -> String {
        match self {
            Parameter::Dac(channel) => format!("DAC {channel} (V)"),
            _ => self.name(),
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Parameter::Dac(_) | Parameter::Stepsize(_) => Some("V"),
            Parameter::Span(_) => None,
        }
    }

    pub fn access(&self) -> AccessControl {
        match self {
            Parameter::Stepsize(_) => AccessControl::ReadOnly,
            Parameter::Dac(_) | Parameter::Span(_) => AccessControl::ReadWrite,
        }
    }

    /// Whether writes to this parameter are followed by the device settle delay.
    pub fn settles(&self) -> bool {
        matches!(self, Parameter::Dac(_))
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix(), self.channel())
    }
}

impl FromStr for Parameter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || Error::UnknownParameter(s.to_string());

        let split = s.find(|c: char| c.is_ascii_digit()).ok_or_else(unknown)?;
        let (prefix, number) = s.split_at(split);

        // Reject forms such as `dac05` which are never registered.
        if number.starts_with('0') {
            return Err(unknown());
        }

        let channel = number
            .parse::<u8>()
            .ok()
            .and_then(|n| Channel::new(n).ok())
            .ok_or_else(unknown)?;

        match prefix {
            "dac" => Ok(Parameter::Dac(channel)),
            "stepsize" => Ok(Parameter::Stepsize(channel)),
            "span" => Ok(Parameter::Span(channel)),
            _ => Err(unknown()),
        }
    }
}

/// A value read from, or written to, a [`Parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Voltage(f64),
    Span(Span),
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Voltage(value)
    }
}

impl From<Span> for ParameterValue {
    fn from(value: Span) -> Self {
        ParameterValue::Span(value)
    }
}

impl Display for ParameterValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterValue::Voltage(value) => write!(f, "{value}"),
            ParameterValue::Span(span) => write!(f, "{span}"),
        }
    }
}
