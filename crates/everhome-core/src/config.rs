// ── Runtime account configuration ──
//
// Describes *how* to reach one Everhome account. Carries credential data
// and polling tuning but never touches disk. The CLI (or any other host)
// builds an `AccountConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use everhome_api::TlsMode;
use secrecy::SecretString;
use url::Url;

use crate::model::SubtypeFilter;

/// Default poll interval for the device list.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credential data for an account.
///
/// Hosts that run their own OAuth2 flow skip this and pass a
/// `TokenProvider` to `Coordinator::with_token_provider` instead.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// A long-lived access token.
    AccessToken(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (local test servers only).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for polling a single account.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Stable identifier of the account, used in entity unique ids.
    pub account_id: String,
    /// API base URL (e.g., `https://everhome.cloud`).
    pub base_url: Url,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    /// Per-request timeout. A timed-out request is a transport failure.
    pub timeout: Duration,
    /// Interval between scheduled refreshes. Zero disables polling.
    pub poll_interval: Duration,
    /// Subtypes kept by the fetcher.
    pub filter: SubtypeFilter,
}

impl AccountConfig {
    /// Config with default TLS, timeout, poll interval, and filter.
    pub fn new(account_id: impl Into<String>, base_url: Url, auth: AuthCredentials) -> Self {
        Self {
            account_id: account_id.into(),
            base_url,
            auth,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            filter: SubtypeFilter::default(),
        }
    }
}
