//! Sitefolio Core - Earned value management for construction projects.
//!
//! This crate contains the EVM calculator, the reporting series builder and
//! the portfolio aggregator, together with the services that feed them. It is
//! storage-agnostic: project records arrive through `RecordStoreTrait`, which
//! callers implement over whatever store they use.

pub mod constants;
pub mod errors;
pub mod evm;
pub mod portfolio;
pub mod projects;
pub mod records;
pub mod settings;
pub mod utils;

// Re-export the engine's main types
pub use evm::*;
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
