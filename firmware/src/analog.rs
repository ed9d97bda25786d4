//! ADC and trigger-pin inputs.
//!
//! # Pins
//!
//! - GPIO 26 (ADC0): Hall-effect throttle sensor
//! - GPIO 27 (ADC1): battery, through a 1:2 divider
//! - GPIO 15: trigger button to ground, internal pull-up

use defmt::warn;
use embassy_rp::adc::{Adc, Blocking, Channel, Error as AdcError};
use embassy_rp::gpio::Input;
use remote_core::{AnalogChannel, AnalogInput, TriggerInput};

/// RP2040 ADC readings are 12-bit; the core works in 10-bit units.
const RESOLUTION_SHIFT: u16 = 2;

/// Blocking ADC reader for the Hall sensor and battery channels.
pub struct AdcInput<'d> {
    adc: Adc<'d, Blocking>,
    hall: Channel<'d>,
    battery: Channel<'d>,
    /// Last good reading per channel, returned when a conversion fails.
    last: [u16; 2],
}

impl<'d> AdcInput<'d> {
    #[must_use]
    pub fn new(adc: Adc<'d, Blocking>, hall: Channel<'d>, battery: Channel<'d>) -> Self {
        Self {
            adc,
            hall,
            battery,
            last: [0; 2],
        }
    }

    fn convert(&mut self, channel: AnalogChannel) -> Result<u16, AdcError> {
        let pin = match channel {
            AnalogChannel::Hall => &mut self.hall,
            AnalogChannel::Battery => &mut self.battery,
        };
        self.adc.blocking_read(pin).map(|raw| raw >> RESOLUTION_SHIFT)
    }
}

impl AnalogInput for AdcInput<'_> {
    fn read_raw(&mut self, channel: AnalogChannel) -> u16 {
        let slot = channel as usize;
        match self.convert(channel) {
            Ok(value) => {
                self.last[slot] = value;
                value
            }
            Err(e) => {
                warn!("ADC read failed on {}: {}", channel, e);
                self.last[slot]
            }
        }
    }
}

/// Active-low trigger button.
pub struct TriggerButton<'d> {
    pin: Input<'d>,
}

impl<'d> TriggerButton<'d> {
    /// `pin` must be configured with a pull-up.
    #[must_use]
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl TriggerInput for TriggerButton<'_> {
    fn is_active(&mut self) -> bool {
        self.pin.is_low()
    }
}
