//! Refresh-token lifecycle service.
//!
//! Issues bound access/refresh credential pairs, enforces single-use
//! rotation of refresh credentials, and provides transactional revocation
//! over a pluggable token store.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod hashing;
pub mod http;
pub mod jwt;
pub mod rotation;
pub mod storage;

// Re-exports for convenience
pub use config::Config;
pub use error::TokenError;
