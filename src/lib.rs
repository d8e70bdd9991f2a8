pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod ledger;
pub mod storage;
pub mod test_utils;
pub mod vault;

pub use error::{Result, VaultError};
pub use vault::{SkillVault, VaultPolicy};

/// Crate version, as reported in JSON envelopes.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
