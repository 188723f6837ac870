//! Command dispatch: bridges CLI args -> core commands -> output formatting.

pub mod config_cmd;
pub mod control;
pub mod devices;
pub mod watch;

use everhome_core::AccountConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an account-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: AccountConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(config, args, global).await,
        Command::Cover(args) => control::handle_cover(config, args, global).await,
        Command::Switch(args) => control::handle_switch(config, args, global).await,
        Command::Light(args) => control::handle_light(config, args, global).await,
        Command::Action(args) => control::handle_action(config, args, global).await,
        Command::Watch(args) => watch::handle(config, args, global).await,
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "completions are generated without an account".into(),
        }),
    }
}
