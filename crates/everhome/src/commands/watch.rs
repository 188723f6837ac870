//! `watch`: run the poll loop and print every new collection.

use std::time::Duration;

use everhome_core::{AccountConfig, Coordinator, RefreshState, SubtypeFilter};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::devices;

pub async fn handle(
    mut config: AccountConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(secs) = args.interval {
        config.poll_interval = Duration::from_secs(secs);
    }
    if !args.category.is_empty() {
        config.filter = SubtypeFilter::for_categories(args.category.iter().copied().map(Into::into));
    }
    if config.poll_interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "poll interval must be at least one second".into(),
        });
    }

    let coordinator = Coordinator::new(config)?;
    coordinator.start().await?;
    let result = watch_loop(&coordinator, global).await;
    coordinator.shutdown().await;
    result
}

async fn watch_loop(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    let mut devices = coordinator.subscribe();
    let mut refreshes = coordinator.subscribe_refresh_state();

    print_snapshot(coordinator, devices.current(), global)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted");
                return Ok(());
            }
            snapshot = devices.changed() => {
                let Some(snapshot) = snapshot else {
                    return Ok(());
                };
                print_snapshot(coordinator, &snapshot, global)?;
            }
            changed = refreshes.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = refreshes.borrow_and_update().clone();
                match state {
                    RefreshState::Failed { error } => {
                        tracing::warn!(%error, "refresh failed; showing last known devices");
                    }
                    RefreshState::ReauthRequired => {
                        return Err(CliError::AuthFailed {
                            message: "access token rejected by the token provider".into(),
                        });
                    }
                    RefreshState::Idle | RefreshState::Refreshing | RefreshState::Ok => {}
                }
            }
        }
    }
}

fn print_snapshot(
    coordinator: &Coordinator,
    snapshot: &everhome_core::DeviceCollection,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !global.quiet {
        let stamp = coordinator
            .store()
            .last_refresh()
            .map_or_else(|| "-".into(), |t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true));
        eprintln!("[{stamp}] {} devices", snapshot.len());
    }
    let rendered = devices::render_collection(snapshot, global)?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
