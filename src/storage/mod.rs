//! Storage layer for the command-line driver
//!
//! Persists the ledger as a locked, integrity-checked JSON snapshot.

pub mod snapshot;

pub use snapshot::{FORMAT_VERSION, Snapshot, StateLock, StateStore};
