//! Outbound adapters: implementations of the driven ports.

pub mod memory;
pub mod persistence;
