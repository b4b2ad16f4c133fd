//! # nightsync client
//!
//! Remote synchronization client for a Nightscout diary service.
//!
//! This crate provides:
//! - Date-bounded fetches of glucose, carbs, temp targets, overrides and
//!   announcements
//! - Uploads of treatments, glucose, device status, preferences, settings
//!   and profiles
//! - Exact-timestamp deletion of carbs, insulin and overrides
//! - `api-secret` authentication
//! - A bounded retry wrapper
//! - A transport abstraction with mock and `reqwest` implementations
//!
//! ## Failure policy
//!
//! Background pulls (glucose, carbs, temp targets, overrides) never fail:
//! an unreachable or misbehaving remote yields an empty result and a
//! warning. Announcements, deletes, uploads and the connection check
//! propagate every failure once the retry budget is spent.
//!
//! ## Key Invariants
//!
//! - Every request carries `api-secret` iff a secret is configured
//! - Records this app uploaded are never fetched back as remote data
//!   (except overrides, which are read back on purpose)
//! - Glucose and announcement fetches include the `since` instant;
//!   carbs, temp target and override fetches exclude it
//! - The client holds no mutable state; calls may run concurrently

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod client;
mod config;
mod error;
mod http;
mod request;
mod retry;
mod transport;

pub use auth::{api_secret_digest, API_SECRET_HEADER};
pub use client::{paths, NightscoutClient};
pub use config::{ClientConfig, OriginMarkers, RetryConfig};
pub use error::{SyncError, SyncResult};
pub use http::HttpTransport;
pub use request::{Bound, Method, Query, Request};
pub use retry::with_retry;
pub use transport::{MockTransport, Transport, TransportError};
