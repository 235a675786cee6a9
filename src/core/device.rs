use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::core::Error;

pub const DEFAULT_DEVICE_NAME: &str = "d5a";

/// Time given to an output to settle after every voltage write.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Configuration of a single D5a module in an SPI rack.
///
/// ```
/// use d5a::prelude::*;
/// use std::time::Duration;
///
/// let device = D5aDevice::from_json(r#"{ "name": "gates", "module": 3 }"#).expect("valid");
/// assert_eq!(device.module, 3);
/// assert_eq!(device.settle_delay, Duration::from_millis(100));
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(default)]
pub struct D5aDevice {
    /// Instrument name, used as the snapshot root.
    pub name: String,
    /// Slot address of the module on the SPI rack.
    pub module: u8,
    /// Written as seconds, e.g. `0.1`.
    #[serde(with = "seconds")]
    pub settle_delay: Duration,
}

mod seconds {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(delay.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}

impl Default for D5aDevice {
    fn default() -> Self {
        D5aDevice {
            name: DEFAULT_DEVICE_NAME.to_string(),
            module: 1,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl Display for D5aDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "D5a '{}' @ module {}", self.name, self.module)
    }
}

impl D5aDevice {
    /// A device used to run tests against an emulated module.
    pub fn emulated() -> D5aDevice {
        D5aDevice::default()
    }

    /// Used to create a [`D5aDevice`] when the module address is known beforehand.
    pub fn known(name: impl Into<String>, module: u8) -> D5aDevice {
        D5aDevice {
            name: name.into(),
            module,
            ..D5aDevice::default()
        }
    }

    /// Replaces the post-write settle delay. A zero delay disables it.
    pub fn with_settle_delay(mut self, delay: Duration) -> D5aDevice {
        self.settle_delay = delay;
        self
    }

    pub fn from_json(content: &str) -> Result<D5aDevice, Error> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod test {
    use crate::prelude::*;
    use std::time::Duration;

    #[test]
    fn defaults() {
        let device = D5aDevice::emulated();
        assert_eq!(device.name, "d5a");
        assert_eq!(device.module, 1);
        assert_eq!(device.settle_delay, Duration::from_millis(100));
    }

    #[test]
    fn known_keeps_default_delay() {
        let device = D5aDevice::known("gates", 4).with_settle_delay(Duration::ZERO);
        assert_eq!(device.name, "gates");
        assert_eq!(device.module, 4);
        assert_eq!(device.settle_delay, Duration::ZERO);
        assert_eq!(device.to_string(), "D5a 'gates' @ module 4");
    }

    #[test]
    fn parses_settle_delay_in_seconds() {
        let device = D5aDevice::from_json(r#"{ "settle_delay": 0.25 }"#).unwrap();
        assert_eq!(device.settle_delay, Duration::from_millis(250));
        assert_eq!(device.name, "d5a");

        let device = D5aDevice::from_json(r#"{ "settle_delay": 0 }"#).unwrap();
        assert_eq!(device.settle_delay, Duration::ZERO);
    }

    #[test]
    fn writes_settle_delay_in_seconds() {
        let json = serde_json::to_value(D5aDevice::known("gates", 3)).unwrap();
        assert_eq!(json["settle_delay"], 0.1);
        assert_eq!(json["module"], 3);
    }

    #[test]
    fn rejects_negative_settle_delay() {
        let err = D5aDevice::from_json(r#"{ "settle_delay": -0.1 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = D5aDevice::from_json(r#"{ "module": "three" }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
