//! Flag overrides on top of `everhome-config` profiles.
//!
//! The CLI is the only layer that knows about `GlobalOpts`; everything it
//! hands to core is a finished `AccountConfig`.

use secrecy::SecretString;

use everhome_config::{Config, Profile};
use everhome_core::AccountConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Profile selected by `--profile`, the config's default, or `"default"`.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, for error help text.
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build an `AccountConfig` from the config file, profile, and CLI flags.
///
/// A missing profile is only an error when it was asked for by name;
/// otherwise the built-in defaults apply and the token must come from
/// `--token`, the environment, or the keyring.
pub fn build_account_config(global: &GlobalOpts, cfg: &Config) -> Result<AccountConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        None => {
            tracing::debug!(profile = %profile_name, "profile not configured, using defaults");
            Profile::default()
        }
    };
    apply_overrides(&mut profile, global);

    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => everhome_config::resolve_token(&profile, &profile_name)?,
    };

    Ok(everhome_config::account_config_with_token(
        &profile,
        &profile_name,
        &cfg.defaults,
        token,
    )?)
}

/// Flag > env > profile.
fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref base_url) = global.base_url {
        profile.base_url.clone_from(base_url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use everhome_core::TlsVerification;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["everhome"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_profile() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                base_url: "https://everhome.cloud".into(),
                token: Some("from-file".into()),
                timeout: Some(60),
                ..Profile::default()
            },
        );

        let opts = global(&[
            "--base-url",
            "http://127.0.0.1:9000/",
            "--token",
            "from-flag",
            "--timeout",
            "5",
            "-k",
        ]);
        let account = build_account_config(&opts, &cfg).unwrap();

        assert_eq!(account.account_id, "default");
        assert_eq!(account.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(account.timeout, Duration::from_secs(5));
        assert_eq!(account.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn named_profile_must_exist() {
        let opts = global(&["--profile", "work", "--token", "t"]);
        let err = build_account_config(&opts, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { .. }));
    }

    #[test]
    fn token_flag_is_enough_without_a_profile() {
        let opts = global(&["--token", "t"]);
        let account = build_account_config(&opts, &Config::default()).unwrap();
        assert_eq!(account.base_url.as_str(), "https://everhome.cloud/");
        assert_eq!(account.poll_interval, Duration::from_secs(300));
    }
}
