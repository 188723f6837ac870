//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use everhome_config::ConfigError;
use everhome_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach Everhome: {message}")]
    #[diagnostic(
        code(everhome::connection_failed),
        help(
            "Check your network connection and the base URL.\n\
             Override it with --base-url or EVERHOME_BASE_URL."
        )
    )]
    ConnectionFailed { message: String },

    #[error("Request timed out: {message}")]
    #[diagnostic(
        code(everhome::timeout),
        help("Increase the timeout with --timeout or check the service status.")
    )]
    Timeout { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(everhome::auth_failed),
        help("Store a fresh access token with: everhome config set-token")
    )]
    AuthFailed { message: String },

    #[error("No access token configured for profile '{profile}'")]
    #[diagnostic(
        code(everhome::no_credentials),
        help(
            "Configure one with: everhome config init\n\
             Or pass --token / set the EVERHOME_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(everhome::api_error))]
    ApiError { message: String, status: Option<u16> },

    #[error("Device '{id}' rejected action '{action}'")]
    #[diagnostic(
        code(everhome::rejected),
        help("Run with -v to see the server response.")
    )]
    ActionRejected { id: String, action: String },

    #[error("Device '{id}' not found")]
    #[diagnostic(
        code(everhome::not_found),
        help("Run: everhome devices list to see available devices")
    )]
    DeviceNotFound { id: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(everhome::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(everhome::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: everhome config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(everhome::config),
        help("Check the config file at: everhome config path")
    )]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(everhome::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. }
            | Self::NoCredentials { .. }
            | Self::ApiError {
                status: Some(401 | 403),
                ..
            } => exit_code::AUTH,
            Self::DeviceNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::ActionRejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthFailure { message } => CliError::AuthFailed { message },
            CoreError::Transport {
                message,
                timeout: true,
            } => CliError::Timeout { message },
            CoreError::Transport { message, .. } => CliError::ConnectionFailed { message },
            CoreError::Protocol {
                message, status, ..
            } => CliError::ApiError { message, status },
            CoreError::DeviceNotFound { id } => CliError::DeviceNotFound { id },
            CoreError::Validation { message } => CliError::Validation {
                field: "command".into(),
                reason: message,
            },
            CoreError::Config { message } => CliError::Config { message },
            stopped @ CoreError::Stopped => CliError::ApiError {
                message: stopped.to_string(),
                status: None,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
