//! View access decisions based on the current session. This is a UX guard only;
//! real access control must live on the API.

use crate::{
    features::auth::{
        state::SessionStore,
        types::{Role, Session},
    },
    routes::paths,
};
use tokio::sync::watch;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessClass {
    /// Rendered regardless of session.
    Public,
    /// Login, register and reset-password: only for signed-out users.
    GuestOnly,
    /// Requires an authenticated session.
    Protected,
    /// Requires an authenticated session whose user has one of these roles.
    Restricted(&'static [Role]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// The session is still settling; show a neutral placeholder.
    Loading,
    Redirect(&'static str),
    /// Authenticated, but the role is not allowed here.
    Forbidden,
}

/// Decides what to do with a view of class `access` for the given session.
#[must_use]
pub fn decide(session: &Session, access: AccessClass) -> GuardDecision {
    if access == AccessClass::Public {
        return GuardDecision::Render;
    }
    if session.is_authenticating() {
        return GuardDecision::Loading;
    }

    let authenticated = session.is_authenticated();
    match access {
        AccessClass::Public => GuardDecision::Render,
        AccessClass::GuestOnly if authenticated => GuardDecision::Redirect(paths::DEFAULT_LANDING),
        AccessClass::GuestOnly => GuardDecision::Render,
        AccessClass::Protected | AccessClass::Restricted(_) if !authenticated => {
            GuardDecision::Redirect(paths::LOGIN)
        }
        AccessClass::Protected => GuardDecision::Render,
        AccessClass::Restricted(roles) => {
            let allowed = session.user().is_some_and(|user| roles.contains(&user.role));
            if allowed {
                GuardDecision::Render
            } else {
                GuardDecision::Forbidden
            }
        }
    }
}

/// Guard bound to a session store that can wait for startup verification to finish.
pub struct RouteGuard {
    receiver: watch::Receiver<Session>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(store: &SessionStore) -> Self {
        Self {
            receiver: store.subscribe(),
        }
    }

    /// Immediate decision; `Loading` while the session is authenticating.
    #[must_use]
    pub fn decide(&self, access: AccessClass) -> GuardDecision {
        decide(&self.receiver.borrow(), access)
    }

    /// Waits until the session leaves `Authenticating`, then decides.
    pub async fn settle(&mut self, access: AccessClass) -> GuardDecision {
        let settled = self
            .receiver
            .wait_for(|session| !session.is_authenticating())
            .await
            .map(|session| decide(&session, access));

        settled.unwrap_or_else(|_| decide(&self.receiver.borrow(), access))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app_lib::{AppConfig, MemoryStore},
        features::auth::{
            token::AuthToken,
            types::{User, UserId},
        },
    };
    use std::{sync::Arc, time::Duration};

    const ADMIN_ONLY: &[Role] = &[Role::Admin];

    fn session_as(role: Role) -> Session {
        Session::authenticated(
            AuthToken::new("T1"),
            User {
                id: UserId::Number(1),
                display_name: "Ana".to_string(),
                email: "a@b.com".to_string(),
                role,
            },
        )
    }

    #[test]
    fn protected_view_redirects_signed_out_users_to_login() {
        for session in [Session::signed_out(), Session::rejected("x"), Session::failed("y")] {
            assert_eq!(
                decide(&session, AccessClass::Protected),
                GuardDecision::Redirect(paths::LOGIN)
            );
        }
    }

    #[test]
    fn guest_only_view_redirects_authenticated_users_to_landing() {
        assert_eq!(
            decide(&session_as(Role::Client), AccessClass::GuestOnly),
            GuardDecision::Redirect(paths::DEFAULT_LANDING)
        );
        assert_eq!(
            decide(&Session::signed_out(), AccessClass::GuestOnly),
            GuardDecision::Render
        );
    }

    #[test]
    fn authenticating_session_shows_loading_except_public() {
        let session = Session::authenticating(Some(AuthToken::new("T1")));
        assert_eq!(decide(&session, AccessClass::Protected), GuardDecision::Loading);
        assert_eq!(decide(&session, AccessClass::GuestOnly), GuardDecision::Loading);
        assert_eq!(decide(&session, AccessClass::Public), GuardDecision::Render);
    }

    #[test]
    fn restricted_view_checks_role() {
        let access = AccessClass::Restricted(ADMIN_ONLY);
        assert_eq!(decide(&session_as(Role::Admin), access), GuardDecision::Render);
        assert_eq!(decide(&session_as(Role::Staff), access), GuardDecision::Forbidden);
        assert_eq!(
            decide(&Session::signed_out(), access),
            GuardDecision::Redirect(paths::LOGIN)
        );
    }

    #[tokio::test]
    async fn settle_waits_for_authenticating_to_finish() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()), &AppConfig::default());
        let generation = store.begin(Session::authenticating(Some(AuthToken::new("T1"))));
        let mut guard = RouteGuard::new(&store);
        assert_eq!(guard.decide(AccessClass::Protected), GuardDecision::Loading);

        let writer = store.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            writer.commit(generation, session_as(Role::Client))
        });

        assert_eq!(guard.settle(AccessClass::Protected).await, GuardDecision::Render);
        assert!(matches!(handle.await, Ok(Ok(()))));
    }
}
