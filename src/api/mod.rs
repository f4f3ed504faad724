//! High-level API services.
//!
//! Exposed via service accessors on clients:
//! - `Client::accounts()` / `BlockingClient::accounts()`

pub mod accounts;

pub use accounts::*;
