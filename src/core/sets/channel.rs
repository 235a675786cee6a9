use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use crate::core::Error;

/// Number of DAC outputs on a D5a module.
pub const CHANNEL_COUNT: u8 = 16;

/// A one-based DAC channel number, always within `1..=16`.
///
/// The module driver addresses channels from zero; use [`Channel::index`]
/// when crossing that boundary.
#[derive(Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
#[serde(try_from = "u8", into = "u8")]
pub struct Channel(u8);

impl Channel {
    pub fn new(number: u8) -> Result<Channel, Error> {
        if (1..=CHANNEL_COUNT).contains(&number) {
            Ok(Channel(number))
        } else {
            Err(Error::ChannelOutOfRange(number))
        }
    }

    /// Zero-based index as understood by the module driver.
    pub const fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

    /// Every channel, in ascending order.
    pub fn all() -> impl Iterator<Item = Channel> {
        (1..=CHANNEL_COUNT).map(Channel)
    }
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Channel::new(value)
    }
}

impl From<Channel> for u8 {
    fn from(value: Channel) -> Self {
        value.0
    }
}

impl Deref for Channel {
    type Target = u8;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
