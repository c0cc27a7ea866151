//! Asynchronous driver for the LS7366R 32-bit quadrature counter

use embedded_hal_async::{
    delay::DelayNs,
    spi::{Operation, SpiDevice},
};

use super::register::{Mdr0, Mdr1, Opcode, Register, Status, instruction};
use crate::error::Error;

/// Time for CNTR to latch into OTR after a `LOAD OTR`
const OTR_LOAD_DELAY_US: u32 = 10;
/// Settling time after writing a mode register
const MODE_SETTLE_DELAY_MS: u32 = 5;

/// LS7366R configuration, written to MDR0/MDR1 by [`Ls7366r::init`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub mdr0: Mdr0,
    pub mdr1: Mdr1,
}

impl Config {
    #[must_use]
    pub fn mdr0(mut self, mdr0: Mdr0) -> Self {
        self.mdr0 = mdr0;
        self
    }

    #[must_use]
    pub fn mdr1(mut self, mdr1: Mdr1) -> Self {
        self.mdr1 = mdr1;
        self
    }
}

/// LS7366R driver instance (asynchronous)
///
/// The counter value is cached: [`sync`](Self::sync) fetches it from the
/// chip and [`count`](Self::count) returns the last fetched value.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ls7366r<SPI, D> {
    spi: SPI,
    delay: D,
    config: Config,
    count: i32,
}

impl<SPI, D, E> Ls7366r<SPI, D>
where
    SPI: SpiDevice<u8, Error = E>,
    D: DelayNs,
{
    /// Create a new LS7366R driver instance
    ///
    /// Nothing is sent to the chip until [`init`](Self::init)
    pub fn new(spi: SPI, delay: D, config: Config) -> Self {
        Self {
            spi,
            delay,
            config,
            count: 0,
        }
    }

    /// Release the SPI device and delay, consuming the driver
    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    /// Write the configured mode registers and clear the counter
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub async fn init(&mut self) -> Result<(), Error<E>> {
        let Config { mdr0, mdr1 } = self.config;
        self.reconfigure(mdr0, mdr1).await?;
        self.reset().await
    }

    /// Send a single-byte instruction
    async fn instruction(&mut self, opcode: Opcode, register: Register) -> Result<(), Error<E>> {
        let command = instruction(opcode, register);

        #[cfg(feature = "defmt")]
        defmt::trace!("Instruction 0x{:02X}", command);

        self.spi
            .write(&[command])
            .await
            .map_err(Error::Communication)
    }

    async fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<E>> {
        let command = instruction(Opcode::Write, register);

        #[cfg(feature = "defmt")]
        defmt::debug!("Writing 0x{:02X} to register {}", value, register);

        self.spi
            .write(&[command, value])
            .await
            .map_err(Error::Communication)
    }

    async fn read_register(&mut self, register: Register, buf: &mut [u8]) -> Result<(), Error<E>> {
        let command = [instruction(Opcode::Read, register)];

        self.spi
            .transaction(&mut [Operation::Write(&command), Operation::Read(buf)])
            .await
            .map_err(Error::Communication)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Register {} value: {=[u8]:#x}", register, &buf[..]);

        Ok(())
    }

    /// Clear the counter on the chip and the cached count
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub async fn reset(&mut self) -> Result<(), Error<E>> {
        self.instruction(Opcode::Clear, Register::Cntr).await?;
        self.count = 0;
        Ok(())
    }

    /// Latch the counter into OTR and read it back
    ///
    /// Reads as many bytes as the configured counter width and sign-extends
    /// them into the cached count.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails; the cached count is kept
    pub async fn sync(&mut self) -> Result<i32, Error<E>> {
        self.instruction(Opcode::Load, Register::Otr).await?;
        self.delay.delay_us(OTR_LOAD_DELAY_US).await;

        let width = self.config.mdr1.width.bytes();
        let mut buf = [0u8; 4];
        self.read_register(Register::Otr, &mut buf[..width]).await?;

        self.count = sign_extend(&buf[..width]);
        Ok(self.count)
    }

    /// Counter value from the last [`sync`](Self::sync) or [`reset`](Self::reset)
    #[must_use]
    pub fn count(&self) -> i32 {
        self.count
    }

    /// Write both mode registers
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub async fn reconfigure(&mut self, mdr0: Mdr0, mdr1: Mdr1) -> Result<(), Error<E>> {
        self.config = Config { mdr0, mdr1 };

        self.write_register(Register::Mdr0, mdr0.bits()).await?;
        self.delay.delay_ms(MODE_SETTLE_DELAY_MS).await;

        self.write_register(Register::Mdr1, mdr1.bits()).await?;
        self.delay.delay_ms(MODE_SETTLE_DELAY_MS).await;

        Ok(())
    }

    /// Read the status register
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub async fn read_status(&mut self) -> Result<Status, Error<E>> {
        let mut buf = [0u8; 1];
        self.read_register(Register::Str, &mut buf).await?;
        Ok(Status::from(buf[0]))
    }

    /// Clear the status register flags
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub async fn clear_status(&mut self) -> Result<(), Error<E>> {
        self.instruction(Opcode::Clear, Register::Str).await
    }

    /// Enable counting
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub async fn enable(&mut self) -> Result<(), Error<E>> {
        self.set_counting_disabled(false).await
    }

    /// Disable counting; the counter holds its value
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub async fn disable(&mut self) -> Result<(), Error<E>> {
        self.set_counting_disabled(true).await
    }

    async fn set_counting_disabled(&mut self, disabled: bool) -> Result<(), Error<E>> {
        let mdr1 = Mdr1 {
            counting_disabled: disabled,
            ..self.config.mdr1
        };
        self.write_register(Register::Mdr1, mdr1.bits()).await?;
        self.config.mdr1 = mdr1;
        Ok(())
    }

    /// Whether counting is enabled according to the last MDR1 written
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.config.mdr1.counting_disabled
    }

    /// The configuration last written to the chip
    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }
}

/// Interpret big-endian bytes as a two's complement value of that width
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
fn sign_extend(bytes: &[u8]) -> i32 {
    let raw = bytes
        .iter()
        .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte));
    let shift = 32 - 8 * bytes.len() as u32;
    ((raw << shift) as i32) >> shift
}
