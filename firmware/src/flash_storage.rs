//! Settings storage in the last sector of the on-board QSPI flash.

use defmt::error;
use embassy_rp::flash::{Blocking, Error as FlashError, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use remote_core::{Storage, StorageError};

/// Flash size of the Raspberry Pi Pico.
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Start of the settings sector, relative to the start of flash.
pub const STORAGE_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Size of the settings region.
pub const STORAGE_SIZE: u32 = ERASE_SIZE as u32;

/// One erase sector used as the settings region.
///
/// Writes erase the whole sector first, so the region holds exactly one
/// record at a time.
pub struct FlashStorage<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
}

impl<'d> FlashStorage<'d> {
    #[must_use]
    pub fn new(flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>) -> Self {
        Self { flash }
    }

    fn absolute(offset: u32, len: usize) -> Result<u32, StorageError> {
        let end = offset
            .checked_add(len as u32)
            .ok_or(StorageError::OutOfBounds)?;
        if end > STORAGE_SIZE {
            return Err(StorageError::OutOfBounds);
        }
        Ok(STORAGE_OFFSET + offset)
    }
}

fn log_flash_error(op: &str, e: FlashError) {
    error!("flash {=str} failed: {}", op, e);
}

impl Storage for FlashStorage<'_> {
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        let at = Self::absolute(offset, buf.len())?;
        self.flash.blocking_read(at, buf).map_err(|e| {
            log_flash_error("read", e);
            StorageError::Read
        })
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError> {
        let at = Self::absolute(offset, data.len())?;
        self.flash
            .blocking_erase(STORAGE_OFFSET, STORAGE_OFFSET + STORAGE_SIZE)
            .map_err(|e| {
                log_flash_error("erase", e);
                StorageError::Write
            })?;
        self.flash.blocking_write(at, data).map_err(|e| {
            log_flash_error("write", e);
            StorageError::Write
        })
    }
}
