//! Drivers for quadrature encoder hardware.
//!
//! - [`abi`] decodes A/B quadrature signals in software from pin-change
//!   interrupts.
//! - [`ls7366r`] talks to the LS7366R hardware quadrature counter over SPI.
//! - [`as5047p`] reads the AS5047P magnetic angle sensor over SPI or
//!   bit-banged GPIOs.
//!
//! # Features
//!
//! - **`defmt`**: derive [`defmt::Format`] on public types and emit
//!   driver trace/debug/warn logs.

#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod abi;
pub mod as5047p;
mod error;
pub mod ls7366r;
mod utils;

pub use error::Error;
pub use utils::ANGLE_MAX;
