//! Codec module - foreign-chain header wire format and invocation parameters

mod hash;
mod header;
mod wire;
mod params;

pub use hash::*;
pub use header::*;
pub use wire::*;
pub use params::*;
