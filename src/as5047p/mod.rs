//! AS5047P 14-bit magnetic rotary position sensor

mod bitbang;
mod driver;
mod register;

pub use bitbang::BitBangReader;
pub use driver::As5047p;
pub use register::{DiagnosticsAgcRegister, ErrorFlagRegister, Register};
