use log::{debug, trace};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use crate::prelude::*;

/// Resolution of the converters on a D5a module.
pub const DAC_RESOLUTION_BITS: u32 = 18;

/// Output limits, in volts, of a span.
pub fn span_limits(span: Span) -> (f64, f64) {
    match span {
        Span::Unipolar4V => (0.0, 4.0),
        Span::Bipolar4V => (-4.0, 4.0),
        Span::Bipolar2V5 => (-2.5, 2.5),
    }
}

/// A call received by the [`EmulatedModule`], zero-based as the driver sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModuleCall {
    Voltage(usize),
    SetVoltage(usize, f64),
    Stepsize(usize),
    SpanCode(usize),
    ChangeSpanUpdate(usize, u8),
}

#[derive(Debug, PartialEq)]
pub enum EmulatedError {
    /// The index does not address one of the 16 outputs.
    NoSuchChannel(usize),
    OutOfRange { index: usize, value: f64, span: Span },
    /// The span code is not supported by the converter.
    InvalidSpanCode(u8),
    /// Raised for any call on a channel marked with [`EmulatedModule::fail_on`].
    Fault(usize),
}

impl Display for EmulatedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EmulatedError::NoSuchChannel(index) => write!(f, "no DAC at index {index}"),
            EmulatedError::OutOfRange { index, value, span } => write!(
                f,
                "{value} V is outside of the '{span}' span of DAC index {index}"
            ),
            EmulatedError::InvalidSpanCode(code) => write!(f, "invalid span code {code}"),
            EmulatedError::Fault(index) => write!(f, "emulated fault on DAC index {index}"),
        }
    }
}

impl std::error::Error for EmulatedError {}

/// An in-memory stand-in for a D5a module.
///
/// Voltages are stored exactly as written, so values read back are never
/// quantised to the converter resolution.
#[derive(Debug)]
pub struct EmulatedModule {
    voltages: [f64; CHANNEL_COUNT as usize],
    spans: [u8; CHANNEL_COUNT as usize],
    faults: HashSet<usize>,
    calls: Vec<ModuleCall>,
}

impl Default for EmulatedModule {
    fn default() -> Self {
        EmulatedModule::new()
    }
}

impl EmulatedModule {
    /// Every channel starts at 0 V in the `4v bi` span.
    pub fn new() -> EmulatedModule {
        EmulatedModule {
            voltages: [0.0; CHANNEL_COUNT as usize],
            spans: [Span::Bipolar4V.code(); CHANNEL_COUNT as usize],
            faults: HashSet::new(),
            calls: Vec::new(),
        }
    }

    /// Makes every subsequent call addressing `index` fail.
    pub fn fail_on(&mut self, index: usize) {
        self.faults.insert(index);
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Overwrites a span code without validation, as a misbehaving driver would.
    pub fn force_span_code(&mut self, index: usize, code: u8) {
        if let Some(slot) = self.spans.get_mut(index) {
            *slot = code;
        }
    }

    pub fn calls(&self) -> &[ModuleCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<ModuleCall> {
        std::mem::take(&mut self.calls)
    }

    fn check(&mut self, call: ModuleCall, index: usize) -> Result<(), EmulatedError> {
        trace!("Emulated module received {call:?}");
        self.calls.push(call);

        if index >= CHANNEL_COUNT as usize {
            return Err(EmulatedError::NoSuchChannel(index));
        }

        if self.faults.contains(&index) {
            return Err(EmulatedError::Fault(index));
        }

        Ok(())
    }

    fn current_span(&self, index: usize) -> Result<Span, EmulatedError> {
        let code = self.spans[index];
        Span::from_code(code).map_err(|_| EmulatedError::InvalidSpanCode(code))
    }
}

impl Module for EmulatedModule {
    type Error = EmulatedError;

    async fn voltage(&mut self, index: usize) -> Result<f64, Self::Error> {
        self.check(ModuleCall::Voltage(index), index)?;
        Ok(self.voltages[index])
    }

    async fn set_voltage(&mut self, index: usize, value: f64) -> Result<(), Self::Error> {
        self.check(ModuleCall::SetVoltage(index, value), index)?;

        let span = self.current_span(index)?;
        let (low, high) = span_limits(span);
        if !(low..=high).contains(&value) {
            return Err(EmulatedError::OutOfRange { index, value, span });
        }

        self.voltages[index] = value;
        Ok(())
    }

    async fn stepsize(&mut self, index: usize) -> Result<f64, Self::Error> {
        self.check(ModuleCall::Stepsize(index), index)?;

        let (low, high) = span_limits(self.current_span(index)?);
        Ok((high - low) / 2f64.powi(DAC_RESOLUTION_BITS as i32))
    }

    async fn span_code(&mut self, index: usize) -> Result<u8, Self::Error> {
        self.check(ModuleCall::SpanCode(index), index)?;
        Ok(self.spans[index])
    }

    async fn change_span_update(&mut self, index: usize, code: u8) -> Result<(), Self::Error> {
        self.check(ModuleCall::ChangeSpanUpdate(index, code), index)?;

        let span = Span::from_code(code).map_err(|_| EmulatedError::InvalidSpanCode(code))?;
        let (low, high) = span_limits(span);

        // The output keeps its voltage where the new span can represent it.
        let voltage = self.voltages[index].clamp(low, high);
        debug!(
            "Emulated DAC index {index} moved to span '{span}', output {} V -> {voltage} V",
            self.voltages[index]
        );

        self.spans[index] = code;
        self.voltages[index] = voltage;
        Ok(())
    }
}

/// Connects to an [`EmulatedModule`], for use without an SPI rack present.
pub struct Emulated;

impl Connect for Emulated {
    type Module = EmulatedModule;

    async fn connect(device: &D5aDevice) -> Result<Self::Module, Error> {
        debug!("Emulating D5a module {} for '{}'", device.module, device.name);
        Ok(EmulatedModule::new())
    }
}
