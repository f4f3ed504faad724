//! Typed client for the form3 organisation accounts API.
//!
//! ```no_run
//! use accounts_sdk::{AccountAttributes, BlockingClient};
//!
//! # fn main() -> accounts_sdk::Result<()> {
//! let client = BlockingClient::new("http://localhost:8080")?;
//! let accounts = client.accounts();
//!
//! let attributes = AccountAttributes::new("GB")
//!     .base_currency("GBP")
//!     .bank_id("400300")
//!     .bank_id_code("GBDSC")
//!     .bic("NWBKGB22");
//! let created = accounts.create(
//!     "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc",
//!     "eb0bd6f5-c3f5-44b2-b677-acd23cdde73c",
//!     &attributes,
//! )?;
//!
//! let page = accounts.list_page(0, 100)?;
//! println!("{} accounts on the first page", page.len());
//!
//! // `version` is the optimistic-concurrency token; never guess it.
//! if let Some(version) = created.version {
//!     accounts.delete(&created.id, version)?;
//! }
//! # Ok(())
//! # }
//! ```

// compile-time guard: enable at least one client kind.
#[cfg(not(any(feature = "async", feature = "blocking")))]
compile_error!("Enable at least one of: `blocking` (default) or `async`.");

pub mod api;
pub mod client;
mod error;
mod request_hook;
pub mod transport;
pub mod types;
mod util;

#[cfg(feature = "async")]
pub use client::{Client, ClientBuilder};
#[cfg(feature = "blocking")]
pub use client::{BlockingClient, BlockingClientBuilder};
pub use client::{API_MEDIA_TYPE, DEFAULT_BASE_URL};
pub use error::{BodySnippetConfig, Error, ErrorKind, HttpError, Result, TransportErrorKind};
pub use request_hook::{RequestHook, RequestHookContext};
pub use types::*;
