//! Cover, switch, light, and raw action handlers.
//!
//! Each handler resolves its command against the freshly fetched device
//! and fails with a non-zero exit when the server rejects the action.

use serde_json::{Map, Value};

use everhome_core::{AccountConfig, Command as CoreCommand, Coordinator, CoreError};

use crate::cli::{
    ActionArgs, CoverArgs, CoverCommand, GlobalOpts, LightArgs, LightCommand, SwitchArgs,
    SwitchCommand,
};
use crate::error::CliError;
use crate::output;

// ── Typed commands ──────────────────────────────────────────────────

pub async fn handle_cover(
    config: AccountConfig,
    args: CoverArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (id, command) = match args.command {
        CoverCommand::Open { id } => (id, CoreCommand::Open),
        CoverCommand::Close { id } => (id, CoreCommand::Close),
        CoverCommand::Stop { id } => (id, CoreCommand::Stop),
        CoverCommand::Position { id, position } => (id, CoreCommand::SetPosition(position)),
    };
    send(config, id, command, global).await
}

pub async fn handle_switch(
    config: AccountConfig,
    args: SwitchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (id, command) = match args.command {
        SwitchCommand::On { id } => (id, CoreCommand::TurnOn),
        SwitchCommand::Off { id } => (id, CoreCommand::TurnOff),
    };
    send(config, id, command, global).await
}

pub async fn handle_light(
    config: AccountConfig,
    args: LightArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (id, command) = match args.command {
        LightCommand::On {
            id,
            brightness: Some(level),
        } => (id, CoreCommand::SetBrightness(level)),
        LightCommand::On { id, brightness: None } => (id, CoreCommand::TurnOn),
        LightCommand::Off { id } => (id, CoreCommand::TurnOff),
    };
    send(config, id, command, global).await
}

async fn send(
    config: AccountConfig,
    id: String,
    command: CoreCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let accepted = Coordinator::oneshot(config, |coordinator| {
        let (id, command) = (id.clone(), command.clone());
        async move { coordinator.send(&id, &command).await }
    })
    .await?;

    if !accepted {
        return Err(CliError::ActionRejected {
            id,
            action: command.name().to_owned(),
        });
    }
    output::print_output(&format!("{} sent to {id}", command.name()), global.quiet);
    Ok(())
}

// ── Raw action ──────────────────────────────────────────────────────

pub async fn handle_action(
    config: AccountConfig,
    args: ActionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let params = parse_params(&args.params)?;
    let (id, action) = (args.id, args.action);

    let accepted = Coordinator::oneshot(config, |coordinator| {
        let (id, action) = (id.clone(), action.clone());
        async move { Ok::<_, CoreError>(coordinator.execute(&id, &action, &params).await) }
    })
    .await?;

    if !accepted {
        return Err(CliError::ActionRejected { id, action });
    }
    output::print_output(&format!("{action} sent to {id}"), global.quiet);
    Ok(())
}

/// Parse `key=value` pairs. Values that parse as JSON keep their type,
/// anything else is sent as a string.
fn parse_params(pairs: &[String]) -> Result<Map<String, Value>, CliError> {
    pairs
        .iter()
        .map(|pair| {
            let (key, raw) = pair.split_once('=').ok_or_else(|| CliError::Validation {
                field: "param".into(),
                reason: format!("expected KEY=VALUE, got '{pair}'"),
            })?;
            if key.is_empty() {
                return Err(CliError::Validation {
                    field: "param".into(),
                    reason: format!("empty key in '{pair}'"),
                });
            }
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.into()));
            Ok((key.to_owned(), value))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn params_keep_json_types() {
        let params = parse_params(&[
            "position=40".into(),
            "fast=true".into(),
            "mode=eco".into(),
            "note=a=b".into(),
        ])
        .unwrap();
        assert_eq!(params["position"], json!(40));
        assert_eq!(params["fast"], json!(true));
        assert_eq!(params["mode"], json!("eco"));
        assert_eq!(params["note"], json!("a=b"));
    }

    #[test]
    fn params_need_a_key_and_equals_sign() {
        assert!(matches!(
            parse_params(&["position".into()]),
            Err(CliError::Validation { .. })
        ));
        assert!(matches!(
            parse_params(&["=1".into()]),
            Err(CliError::Validation { .. })
        ));
    }
}
