//! # sevalla-api
//!
//! Typed client for the Sevalla platform API.
//!
//! The crate is layered, leaves first:
//!
//! - **Transport** ([`SevallaClient`]) - bearer-authenticated JSON requests
//!   with uniform error decoding
//! - **Resource services** ([`services`]) - List/Get/Create/Update/Delete per
//!   resource kind, built on one generic [`Service`]
//! - **Operation poller** ([`wait_for_operation`]) - waits for asynchronous
//!   provisioning to finish and yields the produced resource id
//!
//! Every call that can block takes a [`CancelToken`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use sevalla_api::{CancelToken, ClientConfig, SevallaClient};
//!
//! # async fn example() -> sevalla_api::Result<()> {
//! let client = SevallaClient::new(ClientConfig::new("my-api-token"))?;
//! let cancel = CancelToken::never();
//!
//! for app in client.applications().list("company-id", &cancel).await? {
//!     println!("{} ({})", app.display_name, app.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod client;
pub mod error;
pub mod poller;
pub mod service;
pub mod services;

pub use cancel::{CancelHandle, CancelToken};
pub use client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, SevallaClient};
pub use error::{Result, SevallaError};
pub use poller::{PollConfig, PollEvent, ProgressCallback, wait_for_operation};
pub use service::{ResourceKind, Service};
pub use services::*;
