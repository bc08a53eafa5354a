//! Configuration module for the reconciliation engine.
//!
//! Provides the shift-window table, annual entitlements and the YAML loader.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, EntitlementConfig, ShiftTable, ShiftWindow};
