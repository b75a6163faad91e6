// src/utils/mod.rs
//! Common utilities
//!
//! - **Errors**: crate-wide error type and result alias
//! - **Config**: file and environment backed settings

pub mod config;
pub mod errors;

pub use config::ProxySettings;
pub use errors::{ProxyError, Result};
