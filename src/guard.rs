//! Role-gated access to protected commands
//!
//! The guard is evaluated fresh on every command entry; it keeps no state,
//! timers or cancellation of its own. Content behind a failed check is
//! withheld entirely, never partially rendered.

use placetrack_protocol::Role;

use crate::auth::AuthManager;
use crate::session::Session;

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Session bootstrap has not completed yet.
    Loading,
    /// No valid session; the caller should offer login.
    Unauthenticated,
    /// Session present and the role is permitted.
    Authorized,
    /// Session present but the role is outside the allow-list; absorbing
    /// denial state.
    Forbidden { role: Role },
}

/// Allow-list over roles. `None` admits any authenticated session.
#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    allowed: Option<Vec<Role>>,
}

impl AccessGuard {
    /// Admit any authenticated session regardless of role.
    pub fn any_authenticated() -> Self {
        Self { allowed: None }
    }

    pub fn allow(roles: Vec<Role>) -> Self {
        Self {
            allowed: Some(roles),
        }
    }

    pub fn admin_only() -> Self {
        Self::allow(vec![Role::Admin])
    }

    pub fn evaluate(&self, auth: &AuthManager) -> GuardState {
        self.evaluate_session(auth.is_ready(), auth.session())
    }

    /// Core state machine: Loading exits only once bootstrap completes,
    /// then either Unauthenticated or the role check.
    pub fn evaluate_session(&self, ready: bool, session: Option<&Session>) -> GuardState {
        if !ready {
            return GuardState::Loading;
        }

        let Some(session) = session else {
            return GuardState::Unauthenticated;
        };

        match &self.allowed {
            Some(roles) if !roles.contains(&session.role()) => GuardState::Forbidden {
                role: session.role(),
            },
            _ => GuardState::Authorized,
        }
    }
}
