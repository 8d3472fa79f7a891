//! Key-value persistence boundary

pub mod ports;
