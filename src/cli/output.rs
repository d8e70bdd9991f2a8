use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::error::{ErrorCode, Result, StructuredError, VaultError};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable formatted output with colors (default)
    #[default]
    Human,
    /// Pretty-printed JSON envelope
    Json,
    /// Plain text without colors
    Plain,
}

impl OutputFormat {
    /// Check if this format should use colors
    #[must_use]
    pub const fn use_colors(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// Check if this format is machine-readable
    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json)
    }
}

impl FromStr for OutputFormat {
    type Err = VaultError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "human" | "" => Ok(Self::Human),
            "json" | "robot" => Ok(Self::Json),
            "plain" => Ok(Self::Plain),
            _ => Err(VaultError::Config(format!(
                "invalid output format {value} (expected human|json|plain)"
            ))),
        }
    }
}

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    #[serde(rename = "error")]
    StructuredError {
        code: ErrorCode,
        numeric_code: u16,
        message: String,
        suggestion: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<serde_json::Value>,
        recoverable: bool,
        category: String,
    },
}

impl From<StructuredError> for RobotStatus {
    fn from(err: StructuredError) -> Self {
        Self::StructuredError {
            code: err.code,
            numeric_code: err.numeric_code,
            message: err.message,
            suggestion: err.suggestion,
            context: err.context,
            recoverable: err.recoverable,
            category: err.category,
        }
    }
}

pub fn robot_ok<T: Serialize>(data: T) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Ok,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
    }
}

/// Create a robot error response from a `VaultError` with structured information.
#[must_use]
pub fn robot_error_structured(err: &VaultError) -> RobotResponse<serde_json::Value> {
    RobotResponse {
        status: err.to_structured().into(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data: serde_json::Value::Null,
    }
}

/// Print `data` wrapped in an ok envelope.
pub fn emit_json<T: Serialize>(data: T) -> Result<()> {
    let payload = serde_json::to_string_pretty(&robot_ok(data))?;
    println!("{payload}");
    Ok(())
}

/// Print an error envelope; never fails.
pub fn emit_json_error(err: &VaultError) {
    let response = robot_error_structured(err);
    match serde_json::to_string_pretty(&response) {
        Ok(payload) => println!("{payload}"),
        Err(_) => println!(r#"{{"status":{{"error":{{"message":"{err}"}}}}}}"#),
    }
}
