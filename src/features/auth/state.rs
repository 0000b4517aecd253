//! Session state for the client. [`SessionStore`] holds the current [`Session`],
//! publishes every transition on a watch channel, and owns the persisted token
//! slot. [`SessionManager`] runs the auth flows on top of it.
//!
//! Overlapping operations race; the most recently *issued* one wins. Each mutating
//! operation takes a generation when it starts and only applies its result if no
//! newer operation started since. A superseded call returns `AppError::Superseded`
//! and leaves the session alone.

use crate::{
    app_lib::{AppConfig, AppError, Gateway, KeyValueStore, RegisterMode},
    features::auth::{
        client::AuthClient,
        token::AuthToken,
        types::{AuthResponse, LoginRequest, RegisterRequest, ResetPasswordRequest, Session, User},
        validation::{Credentials, PasswordReset, Registration},
    },
    routes::Navigator,
};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::watch;
use tracing::{Instrument, debug, info, info_span, warn};

struct StoreInner {
    sender: watch::Sender<Session>,
    generation: AtomicU64,
    /// Generation that was current when the last `401` cleared the session.
    expired_generation: AtomicU64,
    storage: Arc<dyn KeyValueStore>,
    token_key: String,
    user_key: String,
}

/// Shared handle to the current session and its persisted slot.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, config: &AppConfig) -> Self {
        let (sender, _receiver) = watch::channel(Session::signed_out());
        Self {
            inner: Arc::new(StoreInner {
                sender,
                generation: AtomicU64::new(0),
                expired_generation: AtomicU64::new(0),
                storage,
                token_key: config.token_key.clone(),
                user_key: config.user_key.clone(),
            }),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.sender.borrow().clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        self.inner.sender.borrow().token().cloned()
    }

    /// Receiver that observes every session transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.sender.subscribe()
    }

    /// Starts a new operation, superseding any in flight, and returns its generation.
    pub(crate) fn begin(&self, next: Session) -> u64 {
        let mut generation = 0;
        self.inner.sender.send_modify(|session| {
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *session = next;
        });
        generation
    }

    /// Applies `next` if `generation` is still the latest operation.
    pub(crate) fn commit(&self, generation: u64, next: Session) -> Result<(), AppError> {
        let applied = self.inner.sender.send_if_modified(|session| {
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *session = next;
            true
        });

        if applied {
            Ok(())
        } else {
            debug!(generation, "discarding superseded session result");
            Err(AppError::Superseded)
        }
    }

    /// Clears the session if it still holds `token`. Returns `true` only for the
    /// call that performed the transition; the persisted slot is cleared by that call.
    /// Any operation in flight is superseded, so it cannot bring the session back.
    pub fn expire(&self, token: &AuthToken, message: &str) -> bool {
        let expired = self.inner.sender.send_if_modified(|session| {
            if session.token() != Some(token) {
                return false;
            }
            let previous = self.inner.generation.fetch_add(1, Ordering::SeqCst);
            self.inner
                .expired_generation
                .store(previous, Ordering::SeqCst);
            *session = Session::rejected(message);
            true
        });

        if expired {
            info!("session expired");
            self.clear_persisted();
        }

        expired
    }

    /// True when a `401` cleared the session while `generation` was current.
    pub(crate) fn expired_during(&self, generation: u64) -> bool {
        generation != 0 && self.inner.expired_generation.load(Ordering::SeqCst) == generation
    }

    /// Reads the persisted token; unreadable storage counts as no token.
    #[must_use]
    pub fn persisted_token(&self) -> Option<AuthToken> {
        match self.inner.storage.get(&self.inner.token_key) {
            Ok(value) => value.as_deref().and_then(AuthToken::parse),
            Err(err) => {
                warn!("failed to read persisted token: {err}");
                None
            }
        }
    }

    /// Cached copy of the last authenticated user, if any.
    #[must_use]
    pub fn cached_user(&self) -> Option<User> {
        let raw = self.inner.storage.get(&self.inner.user_key).ok()??;
        serde_json::from_str(&raw).ok()
    }

    fn persist(&self, token: &AuthToken, user: &User) {
        if let Err(err) = self.inner.storage.set(&self.inner.token_key, token.expose()) {
            warn!("failed to persist token: {err}");
        }
        self.persist_user(user);
    }

    fn persist_user(&self, user: &User) {
        let result = serde_json::to_string(user)
            .map_err(|err| AppError::Serialization(err.to_string()))
            .and_then(|payload| self.inner.storage.set(&self.inner.user_key, &payload));
        if let Err(err) = result {
            warn!("failed to cache user record: {err}");
        }
    }

    fn clear_persisted(&self) {
        for key in [&self.inner.token_key, &self.inner.user_key] {
            if let Err(err) = self.inner.storage.remove(key) {
                warn!("failed to clear persisted {key}: {err}");
            }
        }
    }
}

/// Result of a successful registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Auto-login mode: the session now holds this user.
    Authenticated(User),
    /// The account exists; the caller must `login` next.
    Registered,
}

/// Single source of truth for "am I logged in and as whom".
#[derive(Clone)]
pub struct SessionManager {
    store: SessionStore,
    client: AuthClient,
    register_mode: RegisterMode,
}

impl SessionManager {
    /// Wires a store, gateway and auth client around the given persisted slot.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the API base URL or HTTP client is invalid.
    pub fn new(
        config: &AppConfig,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AppError> {
        let store = SessionStore::new(storage, config);
        let gateway = Gateway::new(config, store.clone(), navigator)?;
        Ok(Self {
            store,
            client: AuthClient::new(gateway, config.endpoints.clone()),
            register_mode: config.register_mode,
        })
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Gateway for the rest of the application's backend calls.
    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        self.client.gateway()
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.store.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.store.subscribe()
    }

    /// Restores the persisted token at startup and verifies it. No persisted token
    /// settles as unauthenticated without a network call. Failures are reflected in
    /// the returned session, never raised.
    pub async fn restore(&self) -> Session {
        match self.store.persisted_token() {
            None => {
                debug!("no persisted token");
                self.store.begin(Session::signed_out());
            }
            Some(token) => {
                let generation = self.store.begin(Session::authenticating(Some(token.clone())));
                if let Err(err) = self
                    .verify_token(generation, token, None)
                    .instrument(info_span!("session.restore"))
                    .await
                {
                    debug!("restore did not authenticate: {err}");
                }
            }
        }
        self.store.snapshot()
    }

    /// Re-validates the current token. Success refreshes the user record; an auth
    /// failure clears the session. A transport failure leaves an authenticated
    /// session unchanged.
    ///
    /// # Errors
    /// Returns `AppError::Unauthorized` when there is no token or the backend
    /// rejects it, or the transport error that prevented the check.
    pub async fn verify(&self) -> Result<User, AppError> {
        let current = self.store.snapshot();
        let Some(token) = current.token().cloned() else {
            return Err(AppError::Unauthorized("No active session.".to_string()));
        };
        let generation = self.store.begin(Session::authenticating(Some(token.clone())));
        let previous = current.user().cloned();
        self.verify_token(generation, token, previous)
            .instrument(info_span!("session.verify"))
            .await
    }

    async fn verify_token(
        &self,
        generation: u64,
        token: AuthToken,
        previous: Option<User>,
    ) -> Result<User, AppError> {
        match self.client.fetch_me().await {
            Ok(user) => {
                self.store
                    .commit(generation, Session::authenticated(token, user.clone()))?;
                self.store.persist_user(&user);
                info!(user_id = %user.id, "session verified");
                Ok(user)
            }
            Err(AppError::Superseded) => Err(AppError::Superseded),
            Err(err) if err.is_transport() => {
                let next = match previous {
                    Some(user) => Session::authenticated(token, user),
                    None => Session::failed(err.message()),
                };
                self.store.commit(generation, next)?;
                warn!("session could not be verified: {err}");
                Err(err)
            }
            Err(err) if err.is_auth() && self.store.expired_during(generation) => {
                info!("persisted session rejected: {err}");
                Err(err)
            }
            Err(err) => {
                self.store
                    .commit(generation, Session::rejected(err.message()))?;
                self.store.clear_persisted();
                info!("persisted session rejected: {err}");
                Err(err)
            }
        }
    }

    /// Signs in with the given credentials. Invalid input fails locally without a
    /// network call and without touching the session. Otherwise the previous session
    /// and its persisted slot are cleared before the request goes out.
    ///
    /// # Errors
    /// Returns `AppError::Validation` for bad input, `AppError::Unauthorized` for
    /// rejected credentials, `AppError::Superseded` if a newer operation started,
    /// or the transport error.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AppError> {
        credentials.validate()?;

        let generation = self.store.begin(Session::authenticating(None));
        self.store.clear_persisted();
        let request = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        };

        let result = async {
            let response = self.client.login(&request).await?;
            self.establish(generation, response).await
        }
        .instrument(info_span!("session.login"))
        .await;

        self.settle(generation, result)
    }

    /// Creates an account. In [`RegisterMode::AutoLogin`] the response must carry a
    /// token and the session is set from it; otherwise the session is untouched.
    ///
    /// # Errors
    /// Returns `AppError::Validation` for bad input or the backend error.
    pub async fn register(&self, registration: &Registration) -> Result<RegisterOutcome, AppError> {
        registration.validate()?;

        let request = RegisterRequest {
            display_name: registration.display_name(),
            email: registration.email(),
            password: registration.password(),
            phone: registration.phone(),
        };

        match self.register_mode {
            RegisterMode::RequireLogin => {
                self.client
                    .register(&request)
                    .instrument(info_span!("session.register"))
                    .await?;
                info!("account registered, login required");
                Ok(RegisterOutcome::Registered)
            }
            RegisterMode::AutoLogin => {
                let generation = self.store.begin(Session::authenticating(None));
                self.store.clear_persisted();
                let result = async {
                    let response = self.client.register_and_sign_in(&request).await?;
                    self.establish(generation, response).await
                }
                .instrument(info_span!("session.register"))
                .await;

                self.settle(generation, result)
                    .map(RegisterOutcome::Authenticated)
            }
        }
    }

    /// Clears the session and the persisted slot. Always succeeds.
    pub fn logout(&self) {
        self.store.begin(Session::signed_out());
        self.store.clear_persisted();
        info!("session cleared by logout");
    }

    /// Asks the backend to send a password reset link. The session is not touched.
    ///
    /// # Errors
    /// Returns `AppError::Validation` for a malformed email or the backend error.
    pub async fn request_password_reset(&self, reset: &PasswordReset) -> Result<(), AppError> {
        reset.validate()?;
        self.client
            .reset_password(&ResetPasswordRequest {
                email: reset.email(),
            })
            .instrument(info_span!("session.reset_password"))
            .await
    }

    /// Turns a token-bearing response into a token and user, fetching the user from
    /// the `me` endpoint when the response omits it.
    async fn establish(
        &self,
        generation: u64,
        response: AuthResponse,
    ) -> Result<(AuthToken, User), AppError> {
        let token = AuthToken::parse(&response.token)
            .ok_or_else(|| AppError::Parse("Response is missing a session token.".to_string()))?;

        let user = match response.user {
            Some(user) => user,
            None => {
                self.store
                    .commit(generation, Session::authenticating(Some(token.clone())))?;
                self.client.fetch_me().await?
            }
        };

        Ok((token, user))
    }

    fn settle(
        &self,
        generation: u64,
        result: Result<(AuthToken, User), AppError>,
    ) -> Result<User, AppError> {
        match result {
            Ok((token, user)) => {
                self.store
                    .commit(generation, Session::authenticated(token.clone(), user.clone()))?;
                self.store.persist(&token, &user);
                info!(user_id = %user.id, role = %user.role, "session authenticated");
                Ok(user)
            }
            Err(AppError::Superseded) => Err(AppError::Superseded),
            // the gateway already cleared the session for the token it issued
            Err(err) if err.is_auth() && self.store.expired_during(generation) => Err(err),
            Err(err) => {
                let next = if err.is_transport() {
                    Session::failed(err.message())
                } else {
                    Session::rejected(err.message())
                };
                self.store.commit(generation, next)?;
                Err(err)
            }
        }
    }
}
