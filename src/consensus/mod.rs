//! Consensus module - network parameter sets, difficulty math, header validation

mod network;
mod difficulty;
mod validation;

pub use network::*;
pub use difficulty::*;
pub use validation::*;
