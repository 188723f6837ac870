// ── Core error types ──
//
// User-facing errors from everhome-core. Consumers see three failure
// families for a refresh (auth, transport, protocol) plus local lookup
// and validation errors. The `From<everhome_api::Error>` impl performs
// the translation.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Refresh failures ─────────────────────────────────────────────
    /// The token provider could not supply a token. Polling stops until
    /// the account is re-authenticated.
    #[error("Authentication failed: {message}")]
    AuthFailure { message: String },

    /// The server could not be reached or did not answer in time.
    #[error("Transport error: {message}")]
    Transport { message: String, timeout: bool },

    /// The server answered, but not with what we expected.
    #[error("{message}")]
    Protocol {
        message: String,
        /// HTTP status, when the failure was a non-200 response.
        status: Option<u16>,
        body: String,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Device not found: {id}")]
    DeviceNotFound { id: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Coordinator has been shut down")]
    Stopped,
}

impl CoreError {
    /// Returns `true` when the account must re-authenticate before polling
    /// can resume.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::AuthFailure { .. })
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<everhome_api::Error> for CoreError {
    fn from(err: everhome_api::Error) -> Self {
        match err {
            everhome_api::Error::Authentication { message } => CoreError::AuthFailure { message },
            everhome_api::Error::Transport(ref e) => CoreError::Transport {
                message: e.to_string(),
                timeout: e.is_timeout(),
            },
            everhome_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            everhome_api::Error::InvalidPathSegment { segment } => {
                CoreError::validation(format!("{segment:?} is not a usable device id"))
            }
            everhome_api::Error::Tls(message) => CoreError::Config {
                message: format!("TLS error: {message}"),
            },
            everhome_api::Error::Http { status, body } => CoreError::Protocol {
                message: format!("Failed to get devices: {status}"),
                status: Some(status),
                body,
            },
            everhome_api::Error::Deserialization { message, body } => CoreError::Protocol {
                message: format!("Malformed device list: {message}"),
                status: None,
                body,
            },
        }
    }
}
