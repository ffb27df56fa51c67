//! Adapter implementations for delivery ports.

pub mod memory;
