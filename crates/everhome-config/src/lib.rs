//! Shared configuration for Everhome tools.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `everhome_core::AccountConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use everhome_core::{
    AccountConfig, AuthCredentials, Category, DEFAULT_BASE_URL, SubtypeFilter, TlsVerification,
};

/// Environment variable consulted for a token when the profile names none.
pub const TOKEN_ENV: &str = "EVERHOME_TOKEN";

const KEYRING_SERVICE: &str = "everhome";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no access token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Poll interval in seconds for `watch`.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    300
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

/// A named account profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Access token (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name containing the access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Categories to poll (`cover`, `switch`, `light`, `binary_sensor`).
    /// All of them when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,

    /// Path to a custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override poll interval (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            token_env: None,
            categories: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            poll_interval: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("cloud", "everhome", "everhome").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("everhome");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (a missing file is fine) merged with `EVERHOME_*`
/// variables. Nested keys use a double underscore, e.g.
/// `EVERHOME_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("EVERHOME_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the access token for a profile.
///
/// Order: the profile's `token_env` variable, then `EVERHOME_TOKEN`,
/// then the system keyring, then the plaintext `token` field.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_token_with(profile, profile_name, |name| std::env::var(name).ok())
}

/// [`resolve_token`] with an injectable environment lookup.
pub fn resolve_token_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(token) = profile.token_env.as_deref().and_then(&env) {
        debug!(profile = profile_name, "token from profile env var");
        return Ok(SecretString::from(token));
    }

    // 2. Global env var
    if let Some(token) = env(TOKEN_ENV) {
        debug!(profile = profile_name, "token from {TOKEN_ENV}");
        return Ok(SecretString::from(token));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            debug!(profile = profile_name, "token from keyring");
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a token for `profile_name` in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token)?;
    Ok(())
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
}

// ── Translation to AccountConfig ────────────────────────────────────

/// Parse a profile's category list into a subtype allow-list.
pub fn subtype_filter(categories: Option<&[String]>) -> Result<SubtypeFilter, ConfigError> {
    let Some(names) = categories else {
        return Ok(SubtypeFilter::all());
    };
    let parsed = names
        .iter()
        .map(|name| {
            name.parse::<Category>().map_err(|_| ConfigError::Validation {
                field: "categories".into(),
                reason: format!(
                    "unknown category '{name}' (expected cover, switch, light, or binary_sensor)"
                ),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SubtypeFilter::for_categories(parsed))
}

/// TLS strategy for a profile: `insecure` wins over `ca_cert`.
pub fn profile_tls(profile: &Profile) -> TlsVerification {
    if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build an `AccountConfig` from a profile, with no CLI overrides.
pub fn profile_to_account_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<AccountConfig, ConfigError> {
    let token = resolve_token(profile, profile_name)?;
    account_config_with_token(profile, profile_name, defaults, token)
}

/// Build an `AccountConfig` from a profile and an already-resolved token.
pub fn account_config_with_token(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    token: SecretString,
) -> Result<AccountConfig, ConfigError> {
    let base_url: url::Url = profile
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", profile.base_url),
        })?;

    let mut config = AccountConfig::new(profile_name, base_url, AuthCredentials::AccessToken(token));
    config.tls = profile_tls(profile);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.poll_interval =
        Duration::from_secs(profile.poll_interval.unwrap_or(defaults.poll_interval));
    config.filter = subtype_filter(profile.categories.as_deref())?;
    Ok(config)
}
