//! Asynchronous SPI driver for AS5047P magnetic position sensor

use embedded_hal_async::spi::SpiDevice;

use super::register::{DiagnosticsAgcRegister, ErrorFlagRegister, Register};
use crate::{
    error::Error,
    utils::{self, DATA_MASK},
};

const READ_BIT: u16 = 0x4000;
const ERROR_FLAG: u16 = 0x4000;
const NOP_COMMAND: u16 = 0x0000;

/// AS5047P driver instance (asynchronous)
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct As5047p<SPI> {
    spi: SPI,
}

impl<SPI, E> As5047p<SPI>
where
    SPI: SpiDevice<u8, Error = E>,
{
    /// Create a new AS5047P driver instance
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Release the SPI device, consuming the driver
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Read a register from the AS5047P
    ///
    /// The response to a command arrives in the following frame:
    /// - Transaction 1: Send read command, ignore response
    /// - Transaction 2: Send NOP, receive actual data
    async fn read_register(&mut self, register: Register) -> Result<u16, Error<E>> {
        let address = u16::from(register);
        let command = utils::with_parity(READ_BIT | address);

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "Reading register 0x{:04X}, command: 0x{:04X}",
            address,
            command
        );

        let mut rx_cmd = [0u8; 2];
        self.spi
            .transfer(&mut rx_cmd, &command.to_be_bytes())
            .await
            .map_err(Error::Communication)?;

        let mut rx_data = [0u8; 2];
        self.spi
            .transfer(&mut rx_data, &NOP_COMMAND.to_be_bytes())
            .await
            .map_err(Error::Communication)?;

        let response = u16::from_be_bytes(rx_data);

        #[cfg(feature = "defmt")]
        defmt::trace!("Received response: 0x{:04X}", response);

        if !utils::verify_parity(response) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Parity error in response: 0x{:04X}", response);
            return Err(Error::ParityError);
        }

        if response & ERROR_FLAG != 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Sensor error flag set in response");
            return Err(Error::SensorError);
        }

        Ok(response & DATA_MASK)
    }

    /// Get the 14-bit compensated angular position
    ///
    /// Value ranges from 0 to 16383 (0° to 359.978°)
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails, parity check fails, or the sensor reports an error
    pub async fn angle(&mut self) -> Result<u16, Error<E>> {
        self.read_register(Register::AngleCom).await
    }

    /// Get the 14-bit angle without dynamic angle error compensation
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails, parity check fails, or the sensor reports an error
    pub async fn angle_uncompensated(&mut self) -> Result<u16, Error<E>> {
        self.read_register(Register::AngleUnc).await
    }

    /// Get the angular position in degrees, `[0, 360)`
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails, parity check fails, or the sensor reports an error
    pub async fn angle_degrees(&mut self) -> Result<f32, Error<E>> {
        self.angle().await.map(utils::angle_to_degrees)
    }

    /// Get the 14-bit CORDIC magnitude
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails, parity check fails, or the sensor reports an error
    pub async fn magnitude(&mut self) -> Result<u16, Error<E>> {
        self.read_register(Register::Mag).await
    }

    /// Get the diagnostics and AGC register
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails, parity check fails, or the sensor reports an error
    pub async fn diagnostics(&mut self) -> Result<DiagnosticsAgcRegister, Error<E>> {
        self.read_register(Register::DiaAgc)
            .await
            .map(DiagnosticsAgcRegister::from)
    }

    /// Read and thereby clear the error flag register
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails, parity check fails, or the sensor reports an error
    pub async fn clear_error_flag(&mut self) -> Result<ErrorFlagRegister, Error<E>> {
        self.read_register(Register::ErrFl)
            .await
            .map(ErrorFlagRegister::from)
    }
}
