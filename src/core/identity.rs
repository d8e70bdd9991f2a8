//! Caller identity and the owner access guard.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

/// The principal on whose behalf a request executes.
///
/// Principals are opaque strings (ledger addresses or account names); two
/// principals are the same identity iff their strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Principal {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Owner check consulted by every owner-gated write.
///
/// The owner is fixed when the vault is deployed and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGuard {
    owner: Principal,
}

impl AccessGuard {
    #[must_use]
    pub const fn new(owner: Principal) -> Self {
        Self { owner }
    }

    #[must_use]
    pub const fn owner(&self) -> &Principal {
        &self.owner
    }

    #[must_use]
    pub fn is_owner(&self, caller: &Principal) -> bool {
        &self.owner == caller
    }

    /// Fail with `OwnerOnly` unless `caller` is the owner.
    pub fn assert_owner(&self, caller: &Principal) -> Result<()> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(VaultError::OwnerOnly {
                caller: caller.clone(),
            })
        }
    }
}
