//! Blocking nRF24L01+ driver in primary-TX mode with acknowledgement
//! payloads.
//!
//! The remote is always the transmitter. Every packet it sends is
//! auto-acknowledged by the receiver, which attaches its latest telemetry to
//! the acknowledgement. Received acknowledgement payloads land in the RX FIFO
//! and are read back with [`RadioChannel::poll_receive`].
//!
//! # Pins
//!
//! SPI0 at 4 MHz:
//! - GPIO 18: SCK
//! - GPIO 19: MOSI
//! - GPIO 16: MISO
//! - GPIO 17: CSN
//! - GPIO 20: CE

use defmt::{debug, info};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use remote_core::{RadioChannel, RadioError};

/// Largest payload the chip supports.
pub const MAX_PAYLOAD: usize = 32;

mod reg {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const TX_ADDR: u8 = 0x10;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;
}

mod cmd {
    pub const R_REGISTER: u8 = 0x00;
    pub const W_REGISTER: u8 = 0x20;
    pub const R_RX_PL_WID: u8 = 0x60;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
}

// CONFIG
const EN_CRC: u8 = 1 << 3;
const CRCO: u8 = 1 << 2;
const PWR_UP: u8 = 1 << 1;
// STATUS
const RX_DR: u8 = 1 << 6;
const TX_DS: u8 = 1 << 5;
const MAX_RT: u8 = 1 << 4;
// FIFO_STATUS
const RX_EMPTY: u8 = 1 << 0;
// FEATURE
const EN_DPL: u8 = 1 << 2;
const EN_ACK_PAY: u8 = 1 << 1;

/// Radio link parameters. Both ends must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct RadioConfig {
    /// 5-byte pipe address, written LSB first.
    pub address: u64,
    /// RF channel, 2400 MHz + `channel`.
    pub channel: u8,
    /// Auto-retransmit delay in 250 us steps above 250 us (0-15).
    pub retry_delay: u8,
    /// Auto-retransmit count (0-15).
    pub retry_count: u8,
}

/// Address and channel the board receiver listens on.
pub const DEFAULT_RADIO_CONFIG: RadioConfig = RadioConfig {
    address: 0xE8E8_F0F0_E1,
    channel: 76,
    retry_delay: 5,
    retry_count: 15,
};

/// Polls of STATUS while waiting for TX_DS or MAX_RT. With the default
/// retry settings a full retry cycle takes about 24 ms.
const TX_POLL_LIMIT: u32 = 400;
const TX_POLL_INTERVAL_US: u32 = 100;

/// nRF24L01+ on an SPI device with a CE pin.
pub struct Nrf24<SPI, CE, D> {
    spi: SPI,
    ce: CE,
    delay: D,
    config: RadioConfig,
}

impl<SPI, CE, D> Nrf24<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    /// Wrap the bus. Call [`Self::init`] before sending.
    pub fn new(spi: SPI, ce: CE, delay: D, config: RadioConfig) -> Self {
        Self {
            spi,
            ce,
            delay,
            config,
        }
    }

    /// Configure the chip for primary TX with dynamic and ack payloads.
    pub fn init(&mut self) -> Result<(), RadioError> {
        self.ce.set_low().map_err(|_| RadioError::Io)?;
        // Power-on reset settle time
        self.delay.delay_ms(5);

        let address = self.config.address.to_le_bytes();
        let address = &address[..5];

        self.write_register(reg::SETUP_AW, 0b11)?;
        self.write_register(
            reg::SETUP_RETR,
            ((self.config.retry_delay & 0x0F) << 4) | (self.config.retry_count & 0x0F),
        )?;
        self.write_register(reg::RF_CH, self.config.channel & 0x7F)?;
        // 1 Mbps, 0 dBm
        self.write_register(reg::RF_SETUP, 0b0000_0110)?;
        self.write_register(reg::EN_AA, 0b0000_0001)?;
        self.write_register(reg::EN_RXADDR, 0b0000_0001)?;
        self.write_register(reg::FEATURE, EN_DPL | EN_ACK_PAY)?;
        self.write_register(reg::DYNPD, 0b0000_0001)?;
        self.write_registers(reg::TX_ADDR, address)?;
        self.write_registers(reg::RX_ADDR_P0, address)?;

        self.command(cmd::FLUSH_TX)?;
        self.command(cmd::FLUSH_RX)?;
        self.write_register(reg::STATUS, RX_DR | TX_DS | MAX_RT)?;

        self.write_register(reg::CONFIG, EN_CRC | CRCO | PWR_UP)?;
        // Standby-I after power up
        self.delay.delay_ms(2);

        if self.read_register(reg::RF_CH)? != self.config.channel & 0x7F {
            return Err(RadioError::Io);
        }
        info!("nRF24L01+ ready on channel {}", self.config.channel);
        Ok(())
    }

    fn command(&mut self, command: u8) -> Result<u8, RadioError> {
        let mut buf = [command];
        self.spi.transfer_in_place(&mut buf).map_err(|_| RadioError::Io)?;
        Ok(buf[0])
    }

    fn read_register(&mut self, register: u8) -> Result<u8, RadioError> {
        let mut buf = [cmd::R_REGISTER | register, 0];
        self.spi.transfer_in_place(&mut buf).map_err(|_| RadioError::Io)?;
        Ok(buf[1])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), RadioError> {
        self.write_registers(register, &[value])
    }

    fn write_registers(&mut self, register: u8, values: &[u8]) -> Result<(), RadioError> {
        self.write_command(cmd::W_REGISTER | register, values)
    }

    fn write_command(&mut self, command: u8, data: &[u8]) -> Result<(), RadioError> {
        let mut buf = [0u8; MAX_PAYLOAD + 1];
        let len = data.len() + 1;
        if len > buf.len() {
            return Err(RadioError::PayloadTooLarge);
        }
        buf[0] = command;
        buf[1..len].copy_from_slice(data);
        self.spi.write(&buf[..len]).map_err(|_| RadioError::Io)
    }

    fn status(&mut self) -> Result<u8, RadioError> {
        self.read_register(reg::STATUS)
    }

    /// Wait for the end of the transmit/retry cycle.
    fn wait_for_tx(&mut self) -> Result<u8, RadioError> {
        for _ in 0..TX_POLL_LIMIT {
            let status = self.status()?;
            if status & (TX_DS | MAX_RT) != 0 {
                return Ok(status);
            }
            self.delay.delay_us(TX_POLL_INTERVAL_US);
        }
        Err(RadioError::Io)
    }
}

impl<SPI, CE, D> RadioChannel for Nrf24<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    fn send(&mut self, payload: &[u8]) -> Result<(), RadioError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(RadioError::PayloadTooLarge);
        }
        self.command(cmd::FLUSH_TX)?;
        self.write_command(cmd::W_TX_PAYLOAD, payload)?;

        // CE high for at least 10 us starts the transmission
        self.ce.set_high().map_err(|_| RadioError::Io)?;
        self.delay.delay_us(15);
        let result = self.wait_for_tx();
        self.ce.set_low().map_err(|_| RadioError::Io)?;

        let status = result?;
        self.write_register(reg::STATUS, TX_DS | MAX_RT)?;
        if status & MAX_RT != 0 {
            self.command(cmd::FLUSH_TX)?;
            return Err(RadioError::NoAck);
        }
        Ok(())
    }

    fn poll_receive(&mut self, buf: &mut [u8]) -> Option<usize> {
        let fifo = self.read_register(reg::FIFO_STATUS).ok()?;
        if fifo & RX_EMPTY != 0 {
            return None;
        }

        let mut width = [cmd::R_RX_PL_WID, 0];
        self.spi.transfer_in_place(&mut width).ok()?;
        let len = usize::from(width[1]);
        if len == 0 || len > MAX_PAYLOAD {
            // Corrupt width: the datasheet requires flushing the RX FIFO
            debug!("discarding RX FIFO, payload width {}", len);
            if let Err(e) = self.command(cmd::FLUSH_RX) {
                debug!("RX FIFO flush failed: {}", e);
            }
            return None;
        }

        let mut frame = [0u8; MAX_PAYLOAD + 1];
        frame[0] = cmd::R_RX_PAYLOAD;
        self.spi.transfer_in_place(&mut frame[..len + 1]).ok()?;
        if let Err(e) = self.write_register(reg::STATUS, RX_DR) {
            // The next poll reads FIFO_STATUS, not RX_DR
            debug!("clearing RX_DR failed: {}", e);
        }

        let copied = len.min(buf.len());
        buf[..copied].copy_from_slice(&frame[1..copied + 1]);
        Some(copied)
    }
}
