//! Async Rust client for the Onevo REST API.
//!
//! The backend speaks plain JSON REST with one quirk: endpoints may return
//! either a raw payload or a `{success, data, message, errors}` envelope,
//! sometimes switching shape between deployments. [`ApiClient`] normalizes
//! both into typed payloads and treats a `404` on optional per-tenant
//! resources (subscription, payment methods) as "no data" rather than an
//! error.
//!
//! Authentication is a bearer token injected as a sensitive default header;
//! session management lives with the caller.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use transport::TransportConfig;
