//! Hand-held wireless throttle remote for RP2040.
//!
//! This crate provides the hardware adapters that connect the
//! platform-agnostic [`remote_core::Remote`] to a Raspberry Pi Pico.
//!
//! # Overview
//!
//! The firmware reads a Hall-effect throttle and a trigger button, sends a
//! throttle command to the board receiver every 50 ms over an nRF24L01+,
//! and receives the board's telemetry in the radio acknowledgements.
//! Holding the trigger at power-on opens the settings menu instead.
//!
//! # Hardware Configuration
//!
//! | Function      | GPIO | Description |
//! |---------------|------|-------------|
//! | ADC0          | 26   | Hall-effect throttle sensor |
//! | ADC1          | 27   | Battery (1:2 divider) |
//! | Trigger       | 15   | Button to ground, internal pull-up |
//! | SPI0 SCK      | 18   | nRF24L01+ |
//! | SPI0 MOSI     | 19   | nRF24L01+ |
//! | SPI0 MISO     | 16   | nRF24L01+ |
//! | CSN           | 17   | nRF24L01+ chip select |
//! | CE            | 20   | nRF24L01+ chip enable |
//!
//! Settings live in the last 4 KiB sector of flash.
//!
//! # Architecture
//!
//! A single Embassy task runs [`Remote::cycle`](remote_core::Remote::cycle)
//! in a loop and yields to the executor between cycles. All rate limiting
//! is done by comparing timestamps, so the loop never sleeps.
//!
//! # Modules
//!
//! - [`analog`]: ADC and trigger inputs ([`AdcInput`], [`TriggerButton`])
//! - [`nrf24`]: Radio driver ([`Nrf24`])
//! - [`flash_storage`]: Settings storage ([`FlashStorage`])
//! - [`display`]: Screen output over defmt ([`LogDisplay`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

use remote_core::{BatteryConfig, RemoteConfig, DEFAULT_CONFIG};

pub mod analog;
pub mod display;
pub mod flash_storage;
pub mod nrf24;

pub use analog::{AdcInput, TriggerButton};
pub use display::LogDisplay;
pub use flash_storage::FlashStorage;
pub use nrf24::{Nrf24, RadioConfig, DEFAULT_RADIO_CONFIG};

/// Tuning for the Pico: 3.3 V ADC reference, battery behind a 1:2 divider.
pub const PICO_CONFIG: RemoteConfig = RemoteConfig {
    battery: BatteryConfig {
        reference_volts: 3.3,
        divider_ratio: 2.0,
        ..DEFAULT_CONFIG.battery
    },
    ..DEFAULT_CONFIG
};
