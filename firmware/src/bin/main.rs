#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_embedded_hal::shared_bus::blocking::spi::SpiDevice;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel as AdcChannel, Config as AdcConfig};
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Delay, Instant};
use esk8_remote::{
    AdcInput, FlashStorage, LogDisplay, Nrf24, TriggerButton, DEFAULT_RADIO_CONFIG, PICO_CONFIG,
};
use remote_core::{LoadOutcome, Remote, RemoteParts};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

type RadioBus = Mutex<NoopRawMutex, RefCell<Spi<'static, SPI0, Blocking>>>;
type RadioSpi = SpiDevice<'static, NoopRawMutex, Spi<'static, SPI0, Blocking>, Output<'static>>;
type Radio = Nrf24<RadioSpi, Output<'static>, Delay>;
type FirmwareRemote =
    Remote<AdcInput<'static>, TriggerButton<'static>, Radio, FlashStorage<'static>, LogDisplay>;

/// SPI bus shared by the radio device.
static RADIO_BUS: StaticCell<RadioBus> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("esk8 remote starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Analog inputs ---
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let hall = AdcChannel::new_pin(p.PIN_26, Pull::None);
    let battery = AdcChannel::new_pin(p.PIN_27, Pull::None);
    let analog = AdcInput::new(adc, hall, battery);

    let trigger = TriggerButton::new(Input::new(p.PIN_15, Pull::Up));

    // --- Radio ---
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = 4_000_000;
    let spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, spi_config);
    let bus = RADIO_BUS.init(Mutex::new(RefCell::new(spi)));
    let csn = Output::new(p.PIN_17, Level::High);
    let ce = Output::new(p.PIN_20, Level::Low);

    let mut radio = Nrf24::new(SpiDevice::new(bus, csn), ce, Delay, DEFAULT_RADIO_CONFIG);
    if let Err(e) = radio.init() {
        // Keep going: sends will fail and the link shows as down
        error!("radio init failed: {}", e);
    }

    // --- Settings storage ---
    let storage = FlashStorage::new(Flash::new_blocking(p.FLASH));

    let remote = Remote::new(
        RemoteParts {
            analog,
            trigger,
            radio,
            storage,
            display: LogDisplay::new(),
        },
        PICO_CONFIG,
    );

    spawner.spawn(control_task(remote).unwrap());

    info!("esk8 remote initialized");
}

/// Control task - runs the remote's cycle as fast as the executor allows.
#[embassy_executor::task]
async fn control_task(mut remote: FirmwareRemote) {
    match remote.start() {
        LoadOutcome::Loaded => info!("settings loaded from flash"),
        LoadOutcome::Reset { reason, saved } => {
            warn!("settings reset to defaults: {}", reason);
            if saved.is_err() {
                error!("defaults could not be written to flash");
            }
        }
    }
    info!("mode: {}", remote.mode());

    loop {
        remote.cycle(Instant::now().as_millis());
        embassy_futures::yield_now().await;
    }
}
