//! JSON-RPC query module
//!
//! Read-only HTTP interface other services use to look up synced headers.

mod methods;
mod server;

pub use methods::*;
pub use server::*;
