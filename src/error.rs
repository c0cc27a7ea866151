/// Error type for encoder and sensor driver operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device (SPI bus or GPIO line)
    Communication(E),
    /// Parity error in received data
    ParityError,
    /// Error flag set by the sensor (invalid command or parity error)
    SensorError,
    /// Steps per revolution must be non-zero
    ZeroStepsPerRevolution,
}
