// everhome-api: Async Rust client for the Everhome cloud device API

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{StaticToken, TokenProvider};
pub use client::{DEFAULT_BASE_URL, EverhomeClient};
pub use error::Error;
pub use models::{DeviceRecord, DeviceStates};
pub use transport::{TlsMode, TransportConfig};
