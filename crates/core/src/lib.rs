//! `tenantnav-core`: foundation building blocks for navigation projection.
//!
//! This crate contains identifiers, the shared error model and configuration
//! (no IO beyond reading environment variables).

pub mod config;
pub mod error;
pub mod id;

pub use config::{NavConfig, RoleIdentifiers, TenantCachePolicy};
pub use error::{NavError, NavResult};
pub use id::{LocaleId, TenantKey};
