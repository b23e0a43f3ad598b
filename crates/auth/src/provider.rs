//! Authentication provider boundary.

use std::sync::Mutex;

use crate::{Session, UserClaims};

/// Surface of the identity provider consumed by navigation.
///
/// Implementations wrap whatever SDK owns the login flow. Calls must be cheap
/// and non-blocking: they are made from the navigation event loop.
pub trait AuthProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// Claims of the current user, if the provider has any.
    fn user_data(&self) -> Option<UserClaims>;

    fn logout(&self);

    /// Snapshot the provider into a `Session`.
    fn snapshot(&self) -> Session {
        if !self.is_authenticated() {
            return Session::anonymous();
        }
        Session::authenticated(self.user_data().unwrap_or_default())
    }
}

impl<P> AuthProvider for std::sync::Arc<P>
where
    P: AuthProvider + ?Sized,
{
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }

    fn user_data(&self) -> Option<UserClaims> {
        (**self).user_data()
    }

    fn logout(&self) {
        (**self).logout()
    }
}

/// In-memory provider for tests/dev and the replay tool.
#[derive(Debug, Default)]
pub struct StaticAuthProvider {
    state: Mutex<Option<UserClaims>>,
}

impl StaticAuthProvider {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(claims: UserClaims) -> Self {
        Self {
            state: Mutex::new(Some(claims)),
        }
    }

    /// Replace the signed-in user.
    pub fn sign_in(&self, claims: UserClaims) {
        if let Ok(mut state) = self.state.lock() {
            *state = Some(claims);
        }
    }
}

impl AuthProvider for StaticAuthProvider {
    fn is_authenticated(&self) -> bool {
        self.state.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    fn user_data(&self) -> Option<UserClaims> {
        self.state.lock().ok().and_then(|s| s.clone())
    }

    fn logout(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = None;
        }
    }
}
