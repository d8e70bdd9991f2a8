//! Property-based tests for vault invariants.

mod vault_props;
