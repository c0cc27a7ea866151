//! Volatile register addresses for the AS5047P sensor.

/// Volatile register addresses for AS5047P
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u16)]
pub enum Register {
    /// No operation
    Nop = 0x0000,
    /// Error register, cleared by reading
    ErrFl = 0x0001,
    /// Diagnostic and AGC
    DiaAgc = 0x3FFC,
    /// CORDIC magnitude (14-bit)
    Mag = 0x3FFD,
    /// Measured angle without dynamic angle error compensation (14-bit)
    AngleUnc = 0x3FFE,
    /// Measured angle with dynamic angle error compensation (14-bit)
    AngleCom = 0x3FFF,
}

impl From<Register> for u16 {
    fn from(reg: Register) -> u16 {
        reg as u16
    }
}

bitfield::bitfield! {
    /// ERRFL
    ///
    /// Reading the register clears it
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct ErrorFlagRegister(u16);
    impl Debug;
    u8;
    /// Parity error
    pub parerr, _: 2;
    /// Invalid command: read or write of an invalid register address
    pub invcomm, _: 1;
    /// Framing error: non-compliant SPI frame detected
    pub frerr, _: 0;
}

impl From<u16> for ErrorFlagRegister {
    fn from(raw: u16) -> Self {
        ErrorFlagRegister(raw)
    }
}

bitfield::bitfield! {
    /// DIAAGC
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct DiagnosticsAgcRegister(u16);
    impl Debug;
    u8;
    /// Magnetic field strength too low; AGC=0xFF
    pub magl, _: 11;
    /// Magnetic field strength too high; AGC=0x00
    pub magh, _: 10;
    /// CORDIC overflow
    pub cof, _: 9;
    /// Offset compensation finished
    pub lf, _: 8;
    /// Automatic gain control value
    pub agc, _: 7, 0;
}

impl DiagnosticsAgcRegister {
    /// Check if the magnetic field strength is within acceptable range
    #[must_use]
    pub fn magnetic_field_ok(&self) -> bool {
        !self.magh() && !self.magl()
    }

    /// Angle and magnitude are only meaningful without CORDIC overflow and
    /// with the magnet in range
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.cof() && self.magnetic_field_ok()
    }
}

impl From<u16> for DiagnosticsAgcRegister {
    fn from(raw: u16) -> Self {
        DiagnosticsAgcRegister(raw)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DiagnosticsAgcRegister {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "DIAAGC {{ magl: {}, magh: {}, cof: {}, lf: {}, agc: {} }}",
            self.magl(),
            self.magh(),
            self.cof(),
            self.lf(),
            self.agc()
        );
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ErrorFlagRegister {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "ERRFL {{ parerr: {}, invcomm: {}, frerr: {} }}",
            self.parerr(),
            self.invcomm(),
            self.frerr()
        );
    }
}
