//! keyward - license-key issuance and verification service
//!
//! Operators issue license records bound to an owner and optionally an IP
//! address and expiry; client software verifies a key to learn whether it is
//! valid and who owns it. Records live in a single JSON file.

pub mod clock;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod id;
pub mod models;
pub mod rate_limit;
pub mod service;
pub mod state;
pub mod store;
pub mod util;
