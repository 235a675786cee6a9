pub mod emulated;

pub use emulated::*;

use crate::core::{D5aDevice, Error};

/// The D5a module driver the adapter forwards to.
///
/// Channels are addressed with a zero-based index (`0..16`). The driver owns
/// all hardware state: the cached output voltages, the span codes, and the
/// voltage-to-code conversion behind them. It is also responsible for range
/// checking and for re-scaling an output when its span changes.
#[allow(async_fn_in_trait)]
pub trait Module {
    type Error;

    /// Last voltage written to the channel, as cached by the driver.
    async fn voltage(&mut self, index: usize) -> Result<f64, Self::Error>;

    async fn set_voltage(&mut self, index: usize, value: f64) -> Result<(), Self::Error>;

    /// Smallest representable voltage increment for the channel's current span.
    async fn stepsize(&mut self, index: usize) -> Result<f64, Self::Error>;

    /// Raw span code currently configured on the channel.
    async fn span_code(&mut self, index: usize) -> Result<u8, Self::Error>;

    /// Changes the span of a channel and re-scales its output accordingly.
    async fn change_span_update(&mut self, index: usize, code: u8) -> Result<(), Self::Error>;
}

/// Constructs a [`Module`] for a configured device.
#[allow(async_fn_in_trait)]
pub trait Connect {
    type Module: Module;

    async fn connect(device: &D5aDevice) -> Result<Self::Module, Error>;
}
