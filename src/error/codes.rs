//! Standardized error codes for receipts and machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Vault errors (returned by state transitions)
//! - 3xx: Config errors
//! - 6xx: Storage errors
//! - 8xx: Transaction errors
//! - 9xx: Internal errors
//!
//! The 1xx codes are part of the on-ledger contract and never change meaning.

use serde::{Deserialize, Serialize};

/// Standardized error codes.
///
/// Each variant maps to a numeric code (e.g., `OwnerOnly` -> E100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Vault errors (1xx)
    // ========================================
    /// E100: Caller is not the vault owner
    OwnerOnly,
    /// E101: Referenced skill does not exist
    SkillNotFound,
    /// E102: Referenced team does not exist
    TeamNotFound,
    /// E103: Progress write would decrease the stored value
    InvalidProgress,
    /// E104: Caller is already a member
    AlreadyMember,
    /// E105: Referenced badge does not exist
    BadgeNotFound,
    /// E106: Request argument failed validation
    InvalidInput,
    /// E107: Counter or aggregate would overflow
    Overflow,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file not found
    ConfigNotFound,
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: No state snapshot at the configured path
    StateNotFound,
    /// E602: State snapshot failed integrity checks
    StateCorrupted,
    /// E603: Failed to write the state snapshot
    StorageWriteError,
    /// E605: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Transaction errors (85x)
    // ========================================
    /// E851: Failed to acquire the state lock within timeout
    LockTimeout,
    /// E853: An all-or-nothing block was rolled back
    BatchAborted,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Unexpected internal error
    InternalError,
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `InvalidProgress` -> 103).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            // Vault errors (1xx)
            Self::OwnerOnly => 100,
            Self::SkillNotFound => 101,
            Self::TeamNotFound => 102,
            Self::InvalidProgress => 103,
            Self::AlreadyMember => 104,
            Self::BadgeNotFound => 105,
            Self::InvalidInput => 106,
            Self::Overflow => 107,

            // Config errors (3xx)
            Self::ConfigNotFound => 301,
            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,

            // Storage errors (6xx)
            Self::StateNotFound => 601,
            Self::StateCorrupted => 602,
            Self::StorageWriteError => 603,
            Self::SerializationError => 605,

            // Transaction errors (85x)
            Self::LockTimeout => 851,
            Self::BatchAborted => 853,

            // Internal errors (9xx)
            Self::InternalError => 901,
            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E100").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::OwnerOnly => "Submit the request from the owner account shown by `sv status`",
            Self::SkillNotFound => "Run `sv status` to see how many skills are registered",
            Self::TeamNotFound => "Create the team first with a `create-team` transaction",
            Self::InvalidProgress => "Progress only grows. Query the current value with `sv query progress`",
            Self::AlreadyMember => "Check existing memberships with `sv query member-teams <user>`",
            Self::BadgeNotFound => "List the badges of a skill with `sv query badges <skill-id>`",
            Self::InvalidInput => "Shorten the value to the configured maximum length",
            Self::Overflow => "Use smaller progress values",
            Self::ConfigNotFound => "Create a config file or pass --config",
            Self::ConfigInvalid => "Fix the reported key in the config file or environment",
            Self::ConfigMissingRequired => "Set the missing value in config.toml or via its SV_* variable",
            Self::StateNotFound => "Run `sv init --owner <id>` to deploy a vault",
            Self::StateCorrupted => "Restore the state file from a backup or re-run `sv init --force`",
            Self::StorageWriteError => "Check permissions and free space in the state directory",
            Self::SerializationError => "Check the transaction file is valid JSON",
            Self::LockTimeout => "Another `sv` process holds the state lock. Retry shortly",
            Self::BatchAborted => "Fix the failing transaction and resubmit the whole block",
            Self::InternalError => "This is a bug. Re-run with -vv and report the output",
            Self::IoError => "Check the path exists and is readable",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::StateCorrupted | Self::SerializationError | Self::InternalError
        )
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "vault",
            3 => "config",
            6 => "storage",
            8 => "transaction",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::OwnerOnly,
            Self::SkillNotFound,
            Self::TeamNotFound,
            Self::InvalidProgress,
            Self::AlreadyMember,
            Self::BadgeNotFound,
            Self::InvalidInput,
            Self::Overflow,
            Self::ConfigNotFound,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::StateNotFound,
            Self::StateCorrupted,
            Self::StorageWriteError,
            Self::SerializationError,
            Self::LockTimeout,
            Self::BatchAborted,
            Self::InternalError,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
