// everhome-core: Polling, state projection, and command dispatch between
// everhome-api and consumers (CLI, host integrations).

pub mod command;
pub mod config;
pub mod coordinator;
pub mod dispatcher;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, ResolvedAction};
pub use config::{
    AccountConfig, AuthCredentials, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, TlsVerification,
};
pub use coordinator::{Coordinator, RefreshState};
pub use dispatcher::ActionDispatcher;
pub use error::CoreError;
pub use fetcher::DeviceFetcher;
pub use store::DeviceStore;
pub use stream::DeviceStream;

pub use model::{
    Category, Device, DeviceClass, DeviceCollection, DeviceId, DeviceState, EntityDescription,
    SubtypeFilter,
};

// Host integrations implement their own token source against this trait.
pub use everhome_api::{DEFAULT_BASE_URL, StaticToken, TokenProvider};
pub use everhome_api::Error as ApiError;
