//! Record store client for the HTTP side of the screening engine's
//! [`SearchClient`](regscreen_screen::SearchClient) seam.
//!
//! No screening logic lives here. No retries. No caching.

mod client;
mod config;

pub use client::{ClientError, RegistryClient};
pub use config::{ClientConfig, SourcePaths};
