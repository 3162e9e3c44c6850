// fhemly-api: Async Rust client for the FHEM command endpoint

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::FhemClient;
pub use error::Error;
pub use models::{JsonList, ListEntry, RawDevice, version_banner};
pub use transport::{TlsMode, TransportConfig};
