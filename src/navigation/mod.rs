//! Session-gated navigation.
//!
//! The router owns one decision: signed in or not. Signed-in users land on
//! one of six dashboards and may open any screen in the catalog; per-screen
//! permission checks are the screen's own business.

mod dashboard;
mod screens;

pub use dashboard::{dashboard_for, select_dashboard, Dashboard, Destination};
pub use screens::{screen_catalog, DashboardContext, EntryScreen, Screen, ScreenContext, ScreenSpec};

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use crate::errors::{AppError, AppResult};
use crate::models::user::{LoginResponse, UserData};
use crate::session::SessionRepository;
use crate::utils::token_fingerprint;

#[derive(Debug, Clone, Default)]
pub enum RouterState {
    #[default]
    Launching,
    Unauthenticated,
    Authenticated(Arc<UserData>),
}

impl RouterState {
    pub fn user(&self) -> Option<&Arc<UserData>> {
        match self {
            RouterState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Launch / login / logout state machine over the persisted session.
///
/// Clones share state and observe the same transitions.
#[derive(Clone)]
pub struct SessionRouter {
    repo: SessionRepository,
    state: Arc<watch::Sender<RouterState>>,
}

impl SessionRouter {
    pub fn new(repo: SessionRepository) -> Self {
        let (state, _) = watch::channel(RouterState::Launching);
        Self { repo, state: Arc::new(state) }
    }

    /// Decide the initial state from storage. Any read or decode failure
    /// lands on the unauthenticated flow.
    pub async fn launch(&self) -> RouterState {
        let next = match self.repo.load().await {
            Ok(Some(session)) => {
                tracing::info!(token = %token_fingerprint(&session.token), "restored session");
                RouterState::Authenticated(Arc::new(session.user))
            }
            Ok(None) => RouterState::Unauthenticated,
            Err(err) => {
                tracing::warn!(error = %err, kind = err.kind(), "session restore failed, starting signed out");
                RouterState::Unauthenticated
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    /// Persist the session and switch to the authenticated flow.
    ///
    /// Returns `false` without touching state or storage when the token is
    /// missing or empty or the user payload is not an object. Returns `false`
    /// without a transition when the write or its read-back fails.
    pub async fn login(&self, token: Option<&str>, user: Value) -> bool {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            tracing::warn!("login rejected: missing or empty token");
            return false;
        };

        let data = match UserData::from_value(user.clone()) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(error = %err, "login rejected: unusable user payload");
                return false;
            }
        };

        if let Err(err) = self.repo.save(token, &user).await {
            tracing::warn!(error = %err, kind = err.kind(), "login not persisted");
            return false;
        }

        match self.repo.load_token().await {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!("login not confirmed: token missing after write");
                return false;
            }
            Err(err) => {
                tracing::warn!(error = %err, kind = err.kind(), "login not confirmed");
                return false;
            }
        }

        tracing::info!(token = %token_fingerprint(token), "signed in");
        self.state.send_replace(RouterState::Authenticated(Arc::new(data)));
        true
    }

    /// Feed a remote login result into [`login`](Self::login). The token must
    /// be a JSON string.
    pub async fn complete_login(&self, response: &LoginResponse) -> bool {
        if !response.success {
            return false;
        }

        let token = response.token.as_ref().and_then(Value::as_str);
        let user = response.user.clone().unwrap_or(Value::Null);
        self.login(token, user).await
    }

    /// Clear storage and switch to the unauthenticated flow. The switch
    /// happens even when clearing fails.
    pub async fn logout(&self) {
        if let Err(err) = self.repo.clear().await {
            tracing::warn!(error = %err, kind = err.kind(), "session clear failed during logout");
        }
        self.state.send_replace(RouterState::Unauthenticated);
        tracing::info!("signed out");
    }

    pub fn repository(&self) -> &SessionRepository {
        &self.repo
    }

    pub fn state(&self) -> RouterState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RouterState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user().is_some()
    }

    pub fn current_user(&self) -> Option<Arc<UserData>> {
        self.state.borrow().user().cloned()
    }

    pub fn initial_destination(&self) -> Destination {
        select_dashboard(self.current_user().as_deref())
    }

    fn require_user(&self) -> AppResult<Arc<UserData>> {
        self.current_user()
            .ok_or_else(|| AppError::unauthorized("sign in required"))
    }

    pub fn open(&self, screen: Screen) -> AppResult<ScreenContext> {
        let user = self.require_user()?;
        let spec = screen.spec();
        let logout = spec.receives_logout.then(|| self.logout_handle());
        Ok(ScreenContext { spec, user, logout })
    }

    pub fn open_dashboard(&self) -> AppResult<DashboardContext> {
        let user = self.require_user()?;
        Ok(DashboardContext {
            dashboard: dashboard_for(&user),
            user,
            logout: self.logout_handle(),
        })
    }

    /// Unauthenticated flow screens are only mounted while signed out.
    pub fn open_entry(&self, entry: EntryScreen) -> AppResult<EntryScreen> {
        if self.is_authenticated() {
            return Err(AppError::bad_request("already signed in"));
        }
        Ok(entry)
    }

    pub fn logout_handle(&self) -> LogoutHandle {
        LogoutHandle { router: self.clone() }
    }
}

/// Logout transition injected into screens.
#[derive(Clone)]
pub struct LogoutHandle {
    router: SessionRouter,
}

impl LogoutHandle {
    pub async fn logout(&self) {
        self.router.logout().await
    }
}

impl fmt::Debug for LogoutHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoutHandle").finish_non_exhaustive()
    }
}
