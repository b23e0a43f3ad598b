use serde::{Deserialize, Serialize};

use crate::UserClaims;

/// Read-only snapshot of the authentication provider's state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub is_authenticated: bool,
    pub claims: UserClaims,
}

impl Session {
    pub fn authenticated(claims: UserClaims) -> Self {
        Self {
            is_authenticated: true,
            claims,
        }
    }

    /// An unauthenticated session. Claims are dropped: nothing about a
    /// previous user may leak into the anonymous view.
    pub fn anonymous() -> Self {
        Self::default()
    }
}
