use either::Either;
use log::{debug, info, trace};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::prelude::*;

/// Result of a client operation: adapter errors on the left, the module's own
/// errors on the right, passed through as the module raised them.
pub type ClientResult<T, M> = Result<T, Either<Error, <M as Module>::Error>>;

/// A client guarded by a single lock, for callers sharing one module.
pub type SharedD5aClient<M> = Arc<Mutex<D5aClient<M>>>;

/// Exposes the sixteen outputs of a D5a module as voltage, step size and span
/// parameters.
///
/// Channels are one-based here and translated to the driver's zero-based
/// index on every call. The client keeps no state of its own beyond the
/// device configuration; every read goes to the module.
#[derive(Debug)]
pub struct D5aClient<M>
where
    M: Module,
{
    pub device: D5aDevice,
    module: M,
}

impl<M> D5aClient<M>
where
    M: Module,
{
    pub fn new(device: D5aDevice, module: M) -> D5aClient<M> {
        D5aClient { device, module }
    }

    pub fn module(&self) -> &M {
        &self.module
    }

    pub fn module_mut(&mut self) -> &mut M {
        &mut self.module
    }

    pub fn into_shared(self) -> SharedD5aClient<M> {
        Arc::new(Mutex::new(self))
    }

    /// Voltage last written to the channel, as cached by the module.
    pub async fn dac(&mut self, channel: Channel) -> ClientResult<f64, M> {
        trace!("Reading dac{channel}");
        self.module
            .voltage(channel.index())
            .await
            .map_err(Either::Right)
    }

    /// Writes a voltage, then waits for the configured settle delay.
    ///
    /// Range checking is left to the module. If the write fails the delay
    /// is skipped.
    pub async fn set_dac(&mut self, channel: Channel, value: f64) -> ClientResult<(), M> {
        self.set(Parameter::Dac(channel), value).await
    }

    async fn write_dac(&mut self, channel: Channel, value: f64) -> ClientResult<(), M> {
        debug!("Setting dac{channel} to {value} V");
        self.module
            .set_voltage(channel.index(), value)
            .await
            .map_err(Either::Right)
    }

    async fn settle(&self) {
        if !self.device.settle_delay.is_zero() {
            tokio::time::sleep(self.device.settle_delay).await;
        }
    }

    pub async fn stepsize(&mut self, channel: Channel) -> ClientResult<f64, M> {
        trace!("Reading stepsize{channel}");
        self.module
            .stepsize(channel.index())
            .await
            .map_err(Either::Right)
    }

    pub async fn span(&mut self, channel: Channel) -> ClientResult<Span, M> {
        trace!("Reading span{channel}");
        let code = self
            .module
            .span_code(channel.index())
            .await
            .map_err(Either::Right)?;

        Span::from_code(code).map_err(Either::Left)
    }

    /// Sets a span from its label, e.g. `"2.5v bi"`.
    ///
    /// An unrecognised label fails before the module is called.
    pub async fn set_span(&mut self, channel: Channel, label: &str) -> ClientResult<(), M> {
        let span = Span::from_label(label).map_err(Either::Left)?;
        self.set_span_to(channel, span).await
    }

    pub async fn set_span_to(&mut self, channel: Channel, span: Span) -> ClientResult<(), M> {
        debug!("Setting span{channel} to '{span}' (code {})", span.code());
        self.module
            .change_span_update(channel.index(), span.code())
            .await
            .map_err(Either::Right)
    }

    /// Sets every output to 0 V, channel 1 first.
    ///
    /// Writes go straight to the module without the settle delay. Stops at
    /// the first failure. Channels before it stay at 0 V and the rest keep
    /// their previous voltage.
    pub async fn set_dacs_zero(&mut self) -> ClientResult<(), M> {
        info!("Zeroing all outputs of {}", self.device);
        for channel in Channel::all() {
            self.write_dac(channel, 0.0).await?;
        }

        Ok(())
    }

    /// Reads any parameter by its typed identifier.
    pub async fn get(&mut self, parameter: Parameter) -> ClientResult<ParameterValue, M> {
        match parameter {
            Parameter::Dac(channel) => self.dac(channel).await.map(ParameterValue::Voltage),
            Parameter::Stepsize(channel) => {
                self.stepsize(channel).await.map(ParameterValue::Voltage)
            }
            Parameter::Span(channel) => self.span(channel).await.map(ParameterValue::Span),
        }
    }

    /// Writes any settable parameter, waiting for the settle delay after
    /// parameters that require it.
    pub async fn set(
        &mut self,
        parameter: Parameter,
        value: impl Into<ParameterValue>,
    ) -> ClientResult<(), M> {
        let value: ParameterValue = value.into();
        match (parameter, value) {
            (Parameter::Stepsize(_), _) => return Err(Either::Left(Error::ReadOnly(parameter))),
            (Parameter::Dac(channel), ParameterValue::Voltage(value)) => {
                self.write_dac(channel, value).await?
            }
            (Parameter::Span(channel), ParameterValue::Span(span)) => {
                self.set_span_to(channel, span).await?
            }
            _ => return Err(Either::Left(Error::ValueMismatch(parameter))),
        }

        if parameter.settles() {
            self.settle().await;
        }

        Ok(())
    }

    /// Reads every parameter, in registration order.
    pub async fn snapshot(&mut self) -> ClientResult<Snapshot, M> {
        let mut parameters = Vec::with_capacity(CHANNEL_COUNT as usize * 3);
        for parameter in Parameter::all() {
            let value = self.get(parameter).await?;
            parameters.push(ParameterSnapshot::new(parameter, value));
        }

        Ok(Snapshot {
            name: self.device.name.clone(),
            module: self.device.module,
            parameters,
        })
    }
}

#[cfg(test)]
mod test {
    use crate::prelude::*;
    use either::Either;
    use std::time::Duration;

    fn ch(n: u8) -> Channel {
        Channel::new(n).unwrap()
    }

    fn client() -> D5aClient<EmulatedModule> {
        D5aClient::new(D5aDevice::emulated(), EmulatedModule::new())
    }

    #[tokio::test(start_paused = true)]
    async fn set_dac_waits_for_settle_delay() {
        let mut device = client();

        let start = tokio::time::Instant::now();
        device.set_dac(ch(5), 1.25).await.expect("set");
        assert!(start.elapsed() >= Duration::from_millis(100));

        assert_eq!(device.dac(ch(5)).await.expect("get"), 1.25);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_does_not_wait() {
        let mut device = D5aClient::new(
            D5aDevice::emulated().with_settle_delay(Duration::ZERO),
            EmulatedModule::new(),
        );

        let start = tokio::time::Instant::now();
        device.set_dac(ch(1), -1.0).await.expect("set");
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_write_skips_settle_delay() {
        let mut device = client();
        device.module_mut().fail_on(0);

        let start = tokio::time::Instant::now();
        let result = device.set_dac(ch(1), 1.0).await;
        assert!(matches!(result, Err(Either::Right(EmulatedError::Fault(0)))));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn dac_forwards_zero_based_index() {
        let mut device = client();
        device.dac(ch(1)).await.expect("get");
        device.stepsize(ch(16)).await.expect("get");

        assert_eq!(
            device.module_mut().take_calls(),
            vec![ModuleCall::Voltage(0), ModuleCall::Stepsize(15)]
        );
    }

    #[tokio::test]
    async fn set_span_translates_label() {
        let mut device = client();
        device.set_span(ch(3), "2.5v bi").await.expect("set");

        assert_eq!(device.span(ch(3)).await.expect("get"), Span::Bipolar2V5);
        assert_eq!(
            device.module().calls(),
            &[ModuleCall::ChangeSpanUpdate(2, 4), ModuleCall::SpanCode(2)]
        );
    }

    #[tokio::test]
    async fn set_span_rejects_unknown_label_without_calling_module() {
        let mut device = client();
        let result = device.set_span(ch(9), "bogus").await;

        assert!(matches!(
            result,
            Err(Either::Left(Error::SpanNotRecognised(ref s))) if s == "bogus"
        ));
        assert!(device.module().calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_span_code_is_reported() {
        let mut device = client();
        device.module_mut().force_span_code(6, 3);

        let result = device.span(ch(7)).await;
        assert!(matches!(result, Err(Either::Left(Error::UnknownSpanCode(3)))));
    }

    #[tokio::test]
    async fn module_errors_pass_through() {
        let mut device = client();
        device.set_span_to(ch(2), Span::Unipolar4V).await.expect("set");

        let result = device.set_dac(ch(2), -1.0).await;
        assert!(matches!(
            result,
            Err(Either::Right(EmulatedError::OutOfRange { index: 1, .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn generic_get_and_set() {
        let mut device = client();

        device.set(Parameter::Dac(ch(4)), 0.75).await.expect("set dac");
        device
            .set(Parameter::Span(ch(4)), Span::Bipolar4V)
            .await
            .expect("set span");

        assert_eq!(
            device.get(Parameter::Dac(ch(4))).await.expect("get"),
            ParameterValue::Voltage(0.75)
        );
        assert_eq!(
            device.get(Parameter::Span(ch(4))).await.expect("get"),
            ParameterValue::Span(Span::Bipolar4V)
        );
        assert_eq!(
            device.get(Parameter::Stepsize(ch(4))).await.expect("get"),
            ParameterValue::Voltage(8.0 / 2f64.powi(18))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn only_voltage_writes_settle() {
        let mut device = client();

        let start = tokio::time::Instant::now();
        device
            .set(Parameter::Span(ch(6)), Span::Unipolar4V)
            .await
            .expect("set span");
        assert_eq!(start.elapsed(), Duration::ZERO);

        device.set(Parameter::Dac(ch(6)), 3.0).await.expect("set dac");
        assert_eq!(start.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_all_skips_settle_delay() {
        let mut device = client();

        let start = tokio::time::Instant::now();
        device.set_dacs_zero().await.expect("zero");
        assert_eq!(start.elapsed(), Duration::ZERO);

        let writes: Vec<ModuleCall> = device.module_mut().take_calls();
        assert_eq!(writes.len(), 16);
        assert_eq!(writes[0], ModuleCall::SetVoltage(0, 0.0));
        assert_eq!(writes[15], ModuleCall::SetVoltage(15, 0.0));
    }

    #[tokio::test]
    async fn generic_set_rejects_read_only_and_mismatched_values() {
        let mut device = client();

        let result = device.set(Parameter::Stepsize(ch(1)), 0.1).await;
        assert!(matches!(result, Err(Either::Left(Error::ReadOnly(Parameter::Stepsize(_))))));

        let result = device.set(Parameter::Dac(ch(1)), Span::Bipolar4V).await;
        assert!(matches!(result, Err(Either::Left(Error::ValueMismatch(Parameter::Dac(_))))));

        let result = device.set(Parameter::Span(ch(1)), 1.0).await;
        assert!(matches!(result, Err(Either::Left(Error::ValueMismatch(Parameter::Span(_))))));

        assert!(device.module().calls().is_empty());
    }

    #[tokio::test]
    async fn shared_client_serialises_access() {
        let shared = D5aClient::new(
            D5aDevice::emulated().with_settle_delay(Duration::ZERO),
            EmulatedModule::new(),
        )
        .into_shared();

        shared.lock().await.set_dac(ch(8), 2.0).await.expect("set");
        let value = shared.lock().await.dac(ch(8)).await.expect("get");
        assert_eq!(value, 2.0);
    }
}
