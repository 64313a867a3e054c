//! Sync module - fork resolution and the header-sync orchestrator

mod fork;
mod handler;

pub use handler::*;
