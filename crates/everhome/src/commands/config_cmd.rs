//! Config subcommand handlers.

use dialoguer::{Input, MultiSelect, Select};
use strum::IntoEnumIterator;

use everhome_config::{self as config, Config, Profile};
use everhome_core::{Category, DEFAULT_BASE_URL};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn read_token(prompt: &str) -> Result<String, CliError> {
    let token = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "access token cannot be empty".into(),
        });
    }
    Ok(token.trim().to_owned())
}

/// Copy of `cfg` with every plaintext token masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
    }
    cfg
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config()?);
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("# {e}")),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken { token } => {
            let cfg = config::load_config()?;
            let profile_name = active_profile_name(global, &cfg);
            let token = match token {
                Some(token) => token,
                None => read_token(&format!("Access token for '{profile_name}': "))?,
            };
            config::store_token(&profile_name, &token)?;
            eprintln!("✓ Token for '{profile_name}' stored in system keyring");
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    // A file that fails to load is never overwritten.
    let mut cfg = config::load_config()?;
    eprintln!("everhome configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let base_url: String = Input::new()
        .with_prompt("API base URL")
        .default(DEFAULT_BASE_URL.into())
        .interact_text()
        .map_err(prompt_err)?;

    let token = read_token("Access token: ")?;

    let store_choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the access token?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let plaintext = if store_selection == 0 {
        config::store_token(&profile_name, &token)?;
        eprintln!("   ✓ Token stored in system keyring");
        None
    } else {
        Some(token)
    };

    let categories: Vec<Category> = Category::iter().collect();
    let labels: Vec<String> = categories.iter().map(ToString::to_string).collect();
    let defaults = vec![true; categories.len()];
    let picked = MultiSelect::new()
        .with_prompt("Device categories to poll")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .map_err(prompt_err)?;

    // All categories selected means no allow-list.
    let categories = (picked.len() != categories.len())
        .then(|| picked.iter().filter_map(|&i| labels.get(i).cloned()).collect());

    let profile = Profile {
        base_url,
        token: plaintext,
        categories,
        ..Profile::default()
    };

    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: everhome devices list");
    Ok(())
}
