//! Read-only bit-banged AS5047P interface
//!
//! For boards where the sensor is wired to plain GPIOs (CSn, CLK, MISO) in
//! the three-wire read-only mode, with MOSI tied to VDD. Every frame then
//! shifts in `0xFFFF`, a read of ANGLECOM with valid parity, so each
//! response carries the compensated angle requested by the frame before.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::{
    error::Error,
    utils::{self, DATA_MASK},
};

/// Error flag (bit 14) of a response frame
const ERROR_FLAG: u16 = 0x4000;
/// Chip-select setup/hold time around a frame
const CS_DELAY_NS: u32 = 350;
/// Half of the CLK period
const HALF_PERIOD_NS: u32 = 100;
/// MISO samples taken while CLK is high
const SAMPLES_PER_BIT: u8 = 5;

/// Bit-banged three-wire AS5047P reader (blocking)
#[derive(Debug)]
pub struct BitBangReader<CS, CLK, MISO, D> {
    cs: CS,
    clk: CLK,
    miso: MISO,
    delay: D,
}

impl<CS, CLK, MISO, D, E> BitBangReader<CS, CLK, MISO, D>
where
    CS: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    MISO: InputPin<Error = E>,
    D: DelayNs,
{
    /// Create a reader and drive CSn high and CLK low
    ///
    /// # Errors
    ///
    /// Returns an error if either output pin cannot be driven
    pub fn new(mut cs: CS, mut clk: CLK, miso: MISO, delay: D) -> Result<Self, Error<E>> {
        cs.set_high().map_err(Error::Communication)?;
        clk.set_low().map_err(Error::Communication)?;
        Ok(Self {
            cs,
            clk,
            miso,
            delay,
        })
    }

    /// Release the pins and delay, consuming the reader
    pub fn release(self) -> (CS, CLK, MISO, D) {
        (self.cs, self.clk, self.miso, self.delay)
    }

    /// Clock in one raw 16-bit frame, MSB first
    ///
    /// Each bit is the majority of several MISO samples taken while CLK is
    /// high, which rejects single-sample glitches on long wires.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin access fails; CSn is left as it was then
    pub fn read_frame(&mut self) -> Result<u16, Error<E>> {
        self.delay.delay_ns(CS_DELAY_NS);
        self.cs.set_low().map_err(Error::Communication)?;
        self.delay.delay_ns(CS_DELAY_NS);

        let mut frame = 0u16;
        for _ in 0..16 {
            self.clk.set_high().map_err(Error::Communication)?;
            self.delay.delay_ns(HALF_PERIOD_NS);

            let mut highs = 0;
            for _ in 0..SAMPLES_PER_BIT {
                if self.miso.is_high().map_err(Error::Communication)? {
                    highs += 1;
                }
            }
            frame = (frame << 1) | u16::from(highs > SAMPLES_PER_BIT / 2);

            self.clk.set_low().map_err(Error::Communication)?;
            self.delay.delay_ns(HALF_PERIOD_NS);
        }

        self.delay.delay_ns(CS_DELAY_NS);
        self.cs.set_high().map_err(Error::Communication)?;
        self.delay.delay_ns(CS_DELAY_NS);

        #[cfg(feature = "defmt")]
        defmt::trace!("Bit-banged frame: 0x{:04X}", frame);

        Ok(frame)
    }

    /// Read the 14-bit angle
    ///
    /// # Errors
    ///
    /// Returns an error if a pin access fails, the frame parity is wrong or
    /// the sensor sets its error flag
    pub fn angle(&mut self) -> Result<u16, Error<E>> {
        let frame = self.read_frame()?;
        if !utils::verify_parity(frame) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Parity error in bit-banged frame: 0x{:04X}", frame);
            return Err(Error::ParityError);
        }

        if frame & ERROR_FLAG != 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Sensor error flag set in bit-banged frame");
            return Err(Error::SensorError);
        }

        Ok(frame & DATA_MASK)
    }

    /// Read the angle in degrees, `[0, 360)`
    ///
    /// # Errors
    ///
    /// Returns an error if a pin access fails, the frame parity is wrong or
    /// the sensor sets its error flag
    pub fn angle_degrees(&mut self) -> Result<f32, Error<E>> {
        self.angle().map(utils::angle_to_degrees)
    }
}
