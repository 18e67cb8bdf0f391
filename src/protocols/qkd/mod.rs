//! Quantum Key Distribution (QKD) Protocols.
//!
//! This module contains the simulated QKD protocol:
//! - **BB84**: prepare-and-measure key exchange with sifting and
//!   key-comparison verification.

pub mod bb84;
