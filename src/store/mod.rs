//! Storage module - key-value handle and the chain-partitioned header store

mod kv;
mod keys;
mod headers;

pub use kv::*;
pub use headers::*;
