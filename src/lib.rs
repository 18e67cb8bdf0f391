mod core;
pub mod protocols;
mod sampler;

pub use crate::core::{Basis, BitFlipChannel, QubitState, errors};
pub use crate::sampler::{SampleStats, Sampler};
