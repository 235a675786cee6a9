use log::info;

use crate::prelude::*;

/// The entry-point structure for connecting to a D5a module.
///
/// This structure does not need to be initialised, but is rather a namespace for helper
/// methods. Note the [turbofish](https://rust.code-maven.com/turbofish) syntax used to
/// select the [`Connect`] implementation.
///
/// ```rust
/// use d5a::prelude::*;
///
/// # async fn docs() {
/// let mut device = D5a::connect::<Emulated>(D5aDevice::emulated())
///     .await
///     .expect("Must connect");
///
/// let dac5 = Channel::new(5).expect("valid channel");
/// device.set_dac(dac5, 1.25).await.expect("Must set");
/// assert_eq!(device.dac(dac5).await.expect("Must read"), 1.25);
/// # }
/// ```
///
/// ## Modules
///
/// - [`Emulated`].
///     An in-memory module with the D5a's spans and 18-bit step sizes. Does not require
///     an SPI rack, and is used for unit and integration testing.
///
/// Hardware drivers plug in by implementing [`Module`] and [`Connect`].
pub struct D5a;

impl D5a {
    /// Builds the module for `device` through `C`, and wraps it in a [`D5aClient`].
    pub async fn connect<C>(device: D5aDevice) -> Result<D5aClient<<C as Connect>::Module>, Error>
    where
        C: Connect,
    {
        let module = C::connect(&device).await?;
        info!("Connected to {device}");

        Ok(D5aClient::new(device, module))
    }

    /// Wraps an already constructed module.
    pub fn connect_with<M>(device: D5aDevice, module: M) -> D5aClient<M>
    where
        M: Module,
    {
        info!("Attached to {device}");
        D5aClient::new(device, module)
    }
}
