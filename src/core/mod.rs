mod channels;
pub mod errors;
mod state;

pub use channels::BitFlipChannel;
pub use state::{Basis, QubitState};
