//! Middleware for `axum::Router` and HTTP request processing.
//!
//! Each concern is an extension trait on [`Router`] so layers compose in
//! the order they are applied (last applied is outermost):
//!
//! ```rust,ignore
//! use pipecraft_server::handler::routes;
//! use pipecraft_server::middleware::{
//!     RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app = routes()
//!     .with_default_security()
//!     .with_observability()
//!     .with_default_recovery();
//! ```
//!
//! [`Router`]: axum::Router

mod observability;
mod recovery;
mod security;

pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, DEFAULT_EDITOR_ORIGIN, RouterSecurityExt};
