//! HTTP surface for the Vita re-verification service.
//!
//! Routes under `/v1`:
//! - credential enrollment (`register/options`, `register/verify`)
//! - credential authentication (`authenticate/options`, `authenticate/verify`)
//! - face similarity verification (`face/verify`)
//! - officer review decisions (`review/decide`)
//!
//! Callers authenticate with a bearer token resolved through the
//! [`auth::CallerIdentity`] seam. All binary fields are hex-encoded in the
//! JSON DTOs. The core stays synchronous; handlers hop to a blocking task
//! for storage and the outbound comparison call.

pub mod auth;
pub mod comparer;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;

pub use config::RpcConfig;
pub use error::RpcError;
pub use server::RpcServer;
