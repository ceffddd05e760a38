//! Grid module: integer cell coordinates and step directions.
//!
//! This is the foundational layer. No other kernel module is imported here.

pub mod cell;
