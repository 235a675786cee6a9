use enum_primitive::FromPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::str::FromStr;

use crate::core::Error;

enum_from_primitive! {
    /// Output range and polarity of a single DAC channel.
    ///
    /// The discriminants are the span codes understood by the module driver.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Span {
        Unipolar4V = 0,
        Bipolar4V = 2,
        Bipolar2V5 = 4
    }
}

/// A single row of the span translation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanEntry {
    pub code: u8,
    pub label: &'static str,
    pub span: Span,
}

/// The label and code of every span the module can report.
///
/// Each code and each label appears exactly once.
pub static SPAN_TABLE: [SpanEntry; 3] = [
    SpanEntry { code: 0, label: "4v uni", span: Span::Unipolar4V },
    SpanEntry { code: 2, label: "4v bi", span: Span::Bipolar4V },
    SpanEntry { code: 4, label: "2.5v bi", span: Span::Bipolar2V5 },
];

impl Span {
    const fn slot(&self) -> usize {
        match self {
            Span::Unipolar4V => 0,
            Span::Bipolar4V => 1,
            Span::Bipolar2V5 => 2,
        }
    }

    pub fn entry(&self) -> &'static SpanEntry {
        &SPAN_TABLE[self.slot()]
    }

    pub fn code(&self) -> u8 {
        self.entry().code
    }

    pub fn label(&self) -> &'static str {
        self.entry().label
    }

    /// Decodes a span code reported by the module driver.
    pub fn from_code(code: u8) -> Result<Span, Error> {
        Span::from_u8(code).ok_or(Error::UnknownSpanCode(code))
    }

    /// Looks up a user-facing span label, such as `"2.5v bi"`.
    pub fn from_label(label: &str) -> Result<Span, Error> {
        SPAN_TABLE
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.span)
            .ok_or_else(|| Error::SpanNotRecognised(label.to_string()))
    }

    pub fn all() -> impl Iterator<Item = Span> {
        SPAN_TABLE.iter().map(|entry| entry.span)
    }
}

impl FromStr for Span {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Span::from_label(s)
    }
}

impl From<Span> for u8 {
    fn from(value: Span) -> Self {
        value.code()
    }
}

// Spans travel as their labels.
impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Span {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Span::from_label(&label).map_err(serde::de::Error::custom)
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
