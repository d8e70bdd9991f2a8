//! Error handling for skill-vault.
//!
//! This module provides:
//! - [`VaultError`]: The main error enum for all vault operations
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`StructuredError`]: Serializable error carried in receipts and JSON output

mod codes;

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;

use crate::core::{BadgeId, Principal, SkillId, TeamId};

/// Main error type for skill-vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Owner only: {caller} is not the vault owner")]
    OwnerOnly { caller: Principal },

    #[error("Skill not found: {0}")]
    SkillNotFound(SkillId),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Badge not found: {0}")]
    BadgeNotFound(BadgeId),

    #[error("Invalid progress for skill {skill_id}: {attempted} is below stored {current}")]
    InvalidProgress {
        skill_id: SkillId,
        current: u64,
        attempted: u64,
    },

    #[error("Already a member: {caller} belongs to team {team_id}")]
    AlreadyMember { caller: Principal, team_id: TeamId },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Overflow: {0}")]
    Overflow(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("No vault state at {}", .0.display())]
    StateNotFound(PathBuf),

    #[error("State corrupted: {0}")]
    StateCorrupted(String),

    #[error("State write failed: {0}")]
    StorageWrite(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lock timeout: {0}")]
    LockTimeout(String),

    #[error("Block aborted at transaction {index}: {reason}")]
    BatchAborted { index: usize, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl VaultError {
    /// Get the error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::OwnerOnly { .. } => ErrorCode::OwnerOnly,
            Self::SkillNotFound(_) => ErrorCode::SkillNotFound,
            Self::TeamNotFound(_) => ErrorCode::TeamNotFound,
            Self::BadgeNotFound(_) => ErrorCode::BadgeNotFound,
            Self::InvalidProgress { .. } => ErrorCode::InvalidProgress,
            Self::AlreadyMember { .. } => ErrorCode::AlreadyMember,
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::Overflow(_) => ErrorCode::Overflow,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::ConfigNotFound(_) => ErrorCode::ConfigNotFound,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::StateNotFound(_) => ErrorCode::StateNotFound,
            Self::StateCorrupted(_) => ErrorCode::StateCorrupted,
            Self::StorageWrite(_) => ErrorCode::StorageWriteError,
            Self::Json(_) => ErrorCode::SerializationError,
            Self::LockTimeout(_) => ErrorCode::LockTimeout,
            Self::BatchAborted { .. } => ErrorCode::BatchAborted,
            Self::Internal(_) => ErrorCode::InternalError,
            Self::Io(_) => ErrorCode::IoError,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::OwnerOnly { caller } => Some(serde_json::json!({ "caller": caller })),
            Self::SkillNotFound(id) => Some(serde_json::json!({ "skill_id": id })),
            Self::TeamNotFound(id) => Some(serde_json::json!({ "team_id": id })),
            Self::BadgeNotFound(id) => Some(serde_json::json!({ "badge_id": id })),
            Self::InvalidProgress {
                skill_id,
                current,
                attempted,
            } => Some(serde_json::json!({
                "skill_id": skill_id,
                "current": current,
                "attempted": attempted,
            })),
            Self::AlreadyMember { caller, team_id } => {
                Some(serde_json::json!({ "caller": caller, "team_id": team_id }))
            }
            Self::InvalidInput { field, .. } => Some(serde_json::json!({ "field": field })),
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            Self::StateNotFound(path) | Self::ConfigNotFound(path) => {
                Some(serde_json::json!({ "path": path.display().to_string() }))
            }
            Self::BatchAborted { index, .. } => Some(serde_json::json!({ "index": index })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_vault_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "OWNER_ONLY")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 100)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "vault", "config")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            message: message.into(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
        }
    }

    /// Create a structured error from a `VaultError`.
    #[must_use]
    pub fn from_vault_error(err: &VaultError) -> Self {
        let mut structured = Self::new(err.code(), err.to_string());
        structured.context = err.context();
        structured
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<VaultError> for StructuredError {
    fn from(err: VaultError) -> Self {
        Self::from_vault_error(&err)
    }
}

impl From<&VaultError> for StructuredError {
    fn from(err: &VaultError) -> Self {
        Self::from_vault_error(err)
    }
}

/// Result type alias using `VaultError`.
pub type Result<T> = std::result::Result<T, VaultError>;
