use std::fmt::{Display, Formatter};

use crate::core::Parameter;

/// Failures raised by the adapter itself.
///
/// Errors produced by the underlying [`Module`](crate::core::Module) are never
/// converted into this type. Client operations return them on the right-hand
/// side of an [`either::Either`], untouched.
#[derive(Debug)]
pub enum Error {
    /// A span label outside of the recognised set was supplied.
    SpanNotRecognised(String),
    /// The module reported a span code with no label in the span table.
    UnknownSpanCode(u8),
    /// Channels are numbered from 1 to 16.
    ChannelOutOfRange(u8),
    /// A string did not name any registered parameter.
    UnknownParameter(String),
    ReadOnly(Parameter),
    /// The supplied value kind does not belong to the parameter.
    ValueMismatch(Parameter),
    Config(serde_json::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SpanNotRecognised(span) => write!(f, "DAC span of '{span}' not recognized."),
            Error::UnknownSpanCode(code) => write!(f, "module reported unknown span code {code}"),
            Error::ChannelOutOfRange(channel) => {
                write!(f, "channel {channel} is out of range, expected 1 to 16")
            }
            Error::UnknownParameter(name) => write!(f, "no parameter named '{name}'"),
            Error::ReadOnly(parameter) => write!(f, "parameter '{parameter}' is read-only"),
            Error::ValueMismatch(parameter) => {
                write!(f, "value kind does not match parameter '{parameter}'")
            }
            Error::Config(error) => write!(f, "invalid device configuration: {error}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(error) => Some(error),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Config(err)
    }
}
