//! LS7366R 32-bit quadrature counter with SPI interface
//!
//! The chip decodes the A/B/I signals in hardware; the driver only
//! configures it and reads the counter over SPI (mode 0, up to 10 MHz).

mod driver;
mod register;

pub use driver::{Config, Ls7366r};
pub use register::{
    CountMode, CounterWidth, FilterDivision, IndexMode, Mdr0, Mdr1, Opcode, QuadratureMode,
    Register, Status,
};
