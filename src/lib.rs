//! Relay network core library
//!
//! A node in a cross-chain relay network ingests block headers of foreign
//! proof-of-work chains (Bitcoin-style) submitted by relayers, validates
//! their linkage and proof-of-work, and maintains a provable canonical
//! "best chain" index per tracked chain inside its own ledger.
//!
//! This crate is the header-sync engine only: the enclosing ledger executor,
//! transaction ordering, and the relayer transport are external collaborators.

pub mod codec;
pub mod consensus;
pub mod store;
pub mod sync;
pub mod rpc;
