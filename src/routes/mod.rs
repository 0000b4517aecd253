//! Route table for the client: every view, its access class, and a router that
//! applies guard decisions through a [`Navigator`].

mod history;
pub mod paths;

pub use history::{History, Navigator};

use crate::features::auth::{
    guards::{AccessClass, GuardDecision, RouteGuard},
    state::SessionStore,
    types::Role,
};
use std::sync::Arc;
use tracing::debug;

const MANAGEMENT: &[Role] = &[Role::Admin];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct View {
    pub path: &'static str,
    pub title: &'static str,
    pub access: AccessClass,
}

const fn view(path: &'static str, title: &'static str, access: AccessClass) -> View {
    View {
        path,
        title,
        access,
    }
}

pub const VIEWS: &[View] = &[
    view(paths::LOGIN, "Login", AccessClass::GuestOnly),
    view(paths::REGISTER, "Register", AccessClass::GuestOnly),
    view(paths::RESET_PASSWORD, "Reset password", AccessClass::GuestOnly),
    view(paths::DASHBOARD, "Dashboard", AccessClass::Protected),
    view(paths::TABLES, "Tables", AccessClass::Protected),
    view(paths::TABLE_LAYOUT, "Table layout", AccessClass::Protected),
    view(paths::EVENTS, "Events", AccessClass::Protected),
    view(paths::STAFF, "Staff", AccessClass::Protected),
    view(paths::RESERVATIONS, "Reservations", AccessClass::Protected),
    view(paths::TICKETS, "Tickets", AccessClass::Protected),
    view(paths::PROMOTIONS, "Promotions", AccessClass::Protected),
    view(paths::SETTINGS, "Settings", AccessClass::Protected),
    view(paths::MY_VENUE, "My venue", AccessClass::Protected),
    view(paths::VENUE_REGISTRATION, "Venue registration", AccessClass::Protected),
    view(paths::FINANCES, "Finances", AccessClass::Restricted(MANAGEMENT)),
    view(paths::REPORTS, "Reports", AccessClass::Restricted(MANAGEMENT)),
];

/// Looks up the view registered for `path`.
#[must_use]
pub fn resolve(path: &str) -> Option<&'static View> {
    let path = paths::normalize(path);
    VIEWS.iter().find(|view| view.path == path)
}

/// What the router ended up showing for a requested path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Rendered(&'static View),
    Redirected {
        from: &'static str,
        to: &'static View,
    },
    Forbidden(&'static View),
    NotFound,
}

pub struct Router {
    guard: RouteGuard,
    navigator: Arc<dyn Navigator>,
}

impl Router {
    #[must_use]
    pub fn new(store: &SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            guard: RouteGuard::new(store),
            navigator,
        }
    }

    /// Opens `path`, waiting for the session to settle before deciding. Redirects
    /// are applied through the navigator.
    pub async fn open(&mut self, path: &str) -> Outcome {
        self.navigator.navigate(path);

        if paths::normalize(path) == paths::ROOT {
            return self.open_root().await;
        }

        let Some(view) = resolve(path) else {
            debug!("no view registered for {path}");
            return Outcome::NotFound;
        };

        match self.guard.settle(view.access).await {
            GuardDecision::Render => Outcome::Rendered(view),
            GuardDecision::Forbidden => Outcome::Forbidden(view),
            GuardDecision::Redirect(target) => self.redirect(view.path, target),
            // the session can no longer settle; treat it as signed out
            GuardDecision::Loading => self.redirect(view.path, paths::LOGIN),
        }
    }

    /// The root path has no view of its own; it forwards to the landing or login view.
    async fn open_root(&mut self) -> Outcome {
        let target = match self.guard.settle(AccessClass::Protected).await {
            GuardDecision::Render | GuardDecision::Forbidden => paths::DEFAULT_LANDING,
            GuardDecision::Redirect(target) => target,
            GuardDecision::Loading => paths::LOGIN,
        };
        self.redirect(paths::ROOT, target)
    }

    fn redirect(&self, from: &'static str, target: &'static str) -> Outcome {
        self.navigator.navigate(target);
        resolve(target).map_or(Outcome::NotFound, |to| Outcome::Redirected { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app_lib::{AppConfig, MemoryStore},
        features::auth::{token::AuthToken, types::Session},
    };

    #[test]
    fn resolve_normalizes_paths() {
        assert_eq!(resolve("/mesas/").map(|v| v.title), Some("Tables"));
        assert_eq!(resolve("/login?next=/mesas").map(|v| v.access), Some(AccessClass::GuestOnly));
        assert!(resolve("/unknown").is_none());
    }

    #[test]
    fn every_auth_entry_view_is_guest_only() {
        for path in paths::AUTH_ENTRY {
            assert_eq!(resolve(path).map(|v| v.access), Some(AccessClass::GuestOnly));
        }
    }

    #[tokio::test]
    async fn unsettled_session_never_renders_protected_views() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()), &AppConfig::default());
        store.begin(Session::authenticating(Some(AuthToken::new("T1"))));
        let history = Arc::new(History::new(paths::ROOT));
        let mut router = Router::new(&store, history.clone());
        drop(store);

        let outcome = router.open(paths::TABLES).await;
        assert!(
            matches!(outcome, Outcome::Redirected { to, .. } if to.path == paths::LOGIN),
            "unexpected {outcome:?}"
        );
        assert_eq!(history.current_path(), paths::LOGIN);

        let outcome = router.open(paths::ROOT).await;
        assert!(matches!(outcome, Outcome::Redirected { to, .. } if to.path == paths::LOGIN));
    }

    #[test]
    fn landing_view_is_protected() {
        assert_eq!(
            resolve(paths::DEFAULT_LANDING).map(|v| v.access),
            Some(AccessClass::Protected)
        );
    }
}
