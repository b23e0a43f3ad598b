//! `tenantnav-auth`: session snapshot and capability evaluation.
//!
//! This crate is intentionally decoupled from any identity-provider SDK; the
//! provider is consumed through the `AuthProvider` trait.

pub mod capability;
pub mod claims;
pub mod provider;
pub mod roles;
pub mod session;

pub use capability::{Capabilities, has_capability, role_label};
pub use claims::UserClaims;
pub use provider::{AuthProvider, StaticAuthProvider};
pub use roles::Role;
pub use session::Session;
