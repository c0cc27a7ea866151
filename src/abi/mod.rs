//! Software decoder for incremental (ABI) quadrature encoders
//!
//! Each input line is wired to an interrupt that fires on both edges. The
//! handler calls [`AbiEncoder::on_a_changed`] or [`AbiEncoder::on_b_changed`],
//! which re-samples that line and steps the count by the decoded transition.

mod config;
mod decoder;
mod encoder;
mod notify;

pub use config::{Config, DEFAULT_STEPS_PER_REVOLUTION, Polarity};
pub use decoder::{Phase, Transition};
pub use encoder::AbiEncoder;
pub use notify::{EdgeHandler, EdgeInterrupt, EdgeSink, Line};
