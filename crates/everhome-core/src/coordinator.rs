// ── Polling coordinator ──
//
// Per-account context: owns the HTTP client, fetcher, dispatcher, device
// store, and background poll task. Cheaply cloneable; every clone talks
// to the same account.

use std::sync::{Arc, Weak};
use std::time::Duration;

use everhome_api::{EverhomeClient, StaticToken, TokenProvider, TransportConfig};
use serde_json::{Map, Value};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::command::Command;
use crate::config::{AccountConfig, AuthCredentials};
use crate::dispatcher::ActionDispatcher;
use crate::error::CoreError;
use crate::fetcher::DeviceFetcher;
use crate::model::{Device, DeviceCollection};
use crate::store::DeviceStore;
use crate::stream::DeviceStream;

// ── RefreshState ─────────────────────────────────────────────────

/// Outcome of the most recent refresh, observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshState {
    /// No refresh has run yet.
    Idle,
    Refreshing,
    /// The last refresh succeeded.
    Ok,
    /// The last refresh failed; the previous collection is still served.
    Failed { error: String },
    /// The token provider failed. Polling has stopped.
    ReauthRequired,
}

// ── Coordinator ──────────────────────────────────────────────────

/// Entry point for consumers of one Everhome account.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: AccountConfig,
    fetcher: DeviceFetcher,
    dispatcher: ActionDispatcher,
    store: Arc<DeviceStore>,
    refresh_state: watch::Sender<RefreshState>,
    /// Serializes fetches so at most one is in flight.
    refresh_lock: Mutex<()>,
    /// Bumped by `request_refresh`; unseen bumps collapse into one.
    refresh_requested: watch::Sender<()>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Coordinator {
    /// Create a coordinator using the credentials in `config`. Does not
    /// fetch anything; call [`start()`](Self::start).
    pub fn new(config: AccountConfig) -> Result<Self, CoreError> {
        let tokens: Arc<dyn TokenProvider> = match &config.auth {
            AuthCredentials::AccessToken(token) => Arc::new(StaticToken::new(token.clone())),
        };
        Self::with_token_provider(config, tokens)
    }

    /// Create a coordinator whose tokens come from a host-owned provider.
    pub fn with_token_provider(
        config: AccountConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: (&config.tls).into(),
            timeout: config.timeout,
        };
        let client = EverhomeClient::new(config.base_url.clone(), tokens, &transport)?;

        let fetcher = DeviceFetcher::new(client.clone(), config.filter.clone());
        let dispatcher = ActionDispatcher::new(client);
        let (refresh_state, _) = watch::channel(RefreshState::Idle);
        let (refresh_requested, _) = watch::channel(());

        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                config,
                fetcher,
                dispatcher,
                store: Arc::new(DeviceStore::new()),
                refresh_state,
                refresh_lock: Mutex::new(()),
                refresh_requested,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &AccountConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DeviceStore> {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Run the first refresh, then start polling.
    ///
    /// The poll task only holds a weak reference, so it also ends once
    /// every `Coordinator` handle is dropped.
    ///
    /// A failed first refresh is returned as-is and no task is spawned:
    /// [`CoreError::AuthFailure`] means the account must re-authenticate,
    /// anything else means the account is not ready yet.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.refresh().await?;

        let interval = self.inner.config.poll_interval;
        if !interval.is_zero() {
            let weak = Arc::downgrade(&self.inner);
            let requests = self.inner.refresh_requested.subscribe();
            let cancel = self.inner.cancel.clone();
            self.inner
                .task_handles
                .lock()
                .await
                .push(tokio::spawn(poll_task(weak, interval, requests, cancel)));
        }

        info!(
            account = %self.inner.config.account_id,
            devices = self.inner.store.device_count(),
            "coordinator started"
        );
        Ok(())
    }

    /// Stop polling and wait for the poll task to exit. A poll that is
    /// still in flight is abandoned rather than awaited.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!(account = %self.inner.config.account_id, "coordinator stopped");
    }

    /// Fetch the device list once.
    ///
    /// On success the stored collection is replaced. On failure it is
    /// left untouched and the error is recorded in [`RefreshState`].
    pub async fn refresh(&self) -> Result<(), CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::Stopped);
        }

        let _guard = self.inner.refresh_lock.lock().await;
        self.inner.refresh_state.send_replace(RefreshState::Refreshing);

        match self.inner.fetcher.fetch().await {
            Ok(collection) => {
                debug!(devices = collection.len(), "refresh complete");
                self.inner.store.replace(collection);
                self.inner.refresh_state.send_replace(RefreshState::Ok);
                Ok(())
            }
            Err(e) => {
                let state = if e.requires_reauth() {
                    RefreshState::ReauthRequired
                } else {
                    RefreshState::Failed {
                        error: e.to_string(),
                    }
                };
                self.inner.refresh_state.send_replace(state);
                Err(e)
            }
        }
    }

    /// Ask the poll task for an out-of-band refresh without waiting.
    ///
    /// Requests made before the task gets to them collapse into one
    /// refresh. Has no effect when polling is disabled.
    pub fn request_refresh(&self) {
        self.inner.refresh_requested.send_replace(());
    }

    // ── Actions ──────────────────────────────────────────────────

    /// Send a raw action. `true` only when the server accepted it.
    pub async fn execute(&self, device_id: &str, action: &str, params: &Map<String, Value>) -> bool {
        self.inner.dispatcher.execute(device_id, action, params).await
    }

    /// Resolve `command` against the stored device, dispatch it, and
    /// request a refresh so the new state shows up early.
    pub async fn send(&self, device_id: &str, command: &Command) -> Result<bool, CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::Stopped);
        }

        let device = self
            .inner
            .store
            .device(device_id)
            .ok_or_else(|| CoreError::DeviceNotFound {
                id: device_id.to_owned(),
            })?;
        let resolved = command.resolve(&device)?;

        debug!(device_id, command = command.name(), action = %resolved.action, "sending command");
        let accepted = self.execute(device_id, &resolved.action, &resolved.params).await;
        self.request_refresh();
        Ok(accepted)
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// Start without polling, run `f`, then shut down.
    pub async fn oneshot<F, Fut, T>(config: AccountConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Coordinator) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.poll_interval = Duration::ZERO;

        let coordinator = Coordinator::new(cfg)?;
        coordinator.start().await?;
        let result = f(coordinator.clone()).await;
        coordinator.shutdown().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    pub fn devices(&self) -> Arc<DeviceCollection> {
        self.inner.store.snapshot()
    }

    pub fn device(&self, device_id: &str) -> Option<Arc<Device>> {
        self.inner.store.device(device_id)
    }

    /// Whether `device_id` is in the current collection.
    pub fn is_available(&self, device_id: &str) -> bool {
        self.inner.store.contains(device_id)
    }

    pub fn subscribe(&self) -> DeviceStream {
        self.inner.store.subscribe()
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.inner.refresh_state.borrow().clone()
    }

    pub fn subscribe_refresh_state(&self) -> watch::Receiver<RefreshState> {
        self.inner.refresh_state.subscribe()
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Refresh on every tick and on every coalesced request until cancelled,
/// the credentials stop working, or the coordinator is dropped.
async fn poll_task(
    weak: Weak<CoordinatorInner>,
    interval: Duration,
    mut requests: watch::Receiver<()>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = requests.changed() => {
                if changed.is_err() {
                    break;
                }
                debug!("refresh requested");
                ticker.reset();
            }
            _ = ticker.tick() => {}
        }

        let Some(inner) = weak.upgrade() else { break };
        let coordinator = Coordinator { inner };
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = coordinator.refresh() => result,
        };

        match result {
            Ok(()) => {}
            Err(CoreError::Stopped) => break,
            Err(e) if e.requires_reauth() => {
                error!(error = %e, "authentication failed; polling stopped until re-authentication");
                break;
            }
            Err(e) => warn!(error = %e, "periodic refresh failed"),
        }
    }
}
