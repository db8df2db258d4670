use std::sync::Arc;

use tokio::sync::watch;

use crate::errors::{AppError, AppResult};
use crate::models::user::UserData;
use crate::session::SessionRepository;

use super::compat::apply_relative_view_patch;
use super::evaluator::PermissionEvaluator;
use super::scope::{derive_route_scope, RouteScope};
use super::AuthzMode;

#[derive(Debug, Clone)]
pub struct LoadedPermissions {
    pub evaluator: PermissionEvaluator,
    pub user: UserData,
}

/// `Loading` until the first load finishes, then `Ready` forever.
/// `Ready(None)` means no session, or a session that could not be read.
#[derive(Debug, Clone, Default)]
pub enum HookState {
    #[default]
    Loading,
    Ready(Option<Arc<LoadedPermissions>>),
}

impl HookState {
    pub fn is_loading(&self) -> bool {
        matches!(self, HookState::Loading)
    }

    pub fn loaded(&self) -> Option<&Arc<LoadedPermissions>> {
        match self {
            HookState::Ready(Some(loaded)) => Some(loaded),
            _ => None,
        }
    }
}

/// Reactive wrapper that loads the permission grant from the session store
/// and answers queries with conservative defaults until it has one.
///
/// Clones share state. Concurrent `refresh` calls are not coalesced; whichever
/// finishes last is what readers see.
#[derive(Clone)]
pub struct PermissionHook {
    repo: SessionRepository,
    mode: AuthzMode,
    state: Arc<watch::Sender<HookState>>,
}

impl PermissionHook {
    pub fn new(repo: SessionRepository, mode: AuthzMode) -> Self {
        let (state, _) = watch::channel(HookState::Loading);
        Self { repo, mode, state: Arc::new(state) }
    }

    /// Initial load. Never fails; read and decode errors leave the hook
    /// ready with no permissions.
    pub async fn load(&self) {
        let loaded = Self::read(&self.repo).await.map(Arc::new);
        let authenticated = loaded.is_some();
        self.state.send_replace(HookState::Ready(loaded));
        tracing::debug!(authenticated, "permissions loaded");
    }

    /// Re-run the load, e.g. after a server-side permission change.
    pub async fn refresh(&self) {
        self.load().await
    }

    async fn read(repo: &SessionRepository) -> Option<LoadedPermissions> {
        match repo.load_user().await {
            Ok(Some(mut user)) => {
                apply_relative_view_patch(&mut user);
                let evaluator = PermissionEvaluator::new(&user);
                Some(LoadedPermissions { evaluator, user })
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, kind = err.kind(), "could not load permissions, treating session as absent");
                None
            }
        }
    }

    /// Change feed for UI layers that re-render on state changes.
    pub fn subscribe(&self) -> watch::Receiver<HookState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> HookState {
        self.state.borrow().clone()
    }

    fn with<T>(&self, default: T, f: impl FnOnce(&LoadedPermissions) -> T) -> T {
        match self.state.borrow().loaded() {
            Some(loaded) => f(loaded),
            None => default,
        }
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn is_authenticated(&self) -> bool {
        self.with(false, |_| true)
    }

    pub fn user(&self) -> Option<UserData> {
        self.with(None, |l| Some(l.user.clone()))
    }

    pub fn evaluator(&self) -> Option<PermissionEvaluator> {
        self.with(None, |l| Some(l.evaluator.clone()))
    }

    pub fn can(&self, resource: &str, action: &str) -> bool {
        self.with(false, |l| l.evaluator.can(resource, action))
    }

    pub fn can_view(&self, resource: &str) -> bool {
        self.with(false, |l| l.evaluator.can_view(resource))
    }

    pub fn can_create(&self, resource: &str) -> bool {
        self.with(false, |l| l.evaluator.can_create(resource))
    }

    pub fn can_edit(&self, resource: &str) -> bool {
        self.with(false, |l| l.evaluator.can_edit(resource))
    }

    pub fn can_delete(&self, resource: &str) -> bool {
        self.with(false, |l| l.evaluator.can_delete(resource))
    }

    pub fn is_read_only(&self, resource: &str) -> bool {
        self.with(false, |l| l.evaluator.is_read_only(resource))
    }

    pub fn is_admin(&self) -> bool {
        self.with(false, |l| l.evaluator.is_admin())
    }

    pub fn is_super_admin(&self) -> bool {
        self.with(false, |l| l.evaluator.is_super_admin())
    }

    pub fn is_care_manager(&self) -> bool {
        self.with(false, |l| l.evaluator.is_care_manager())
    }

    pub fn is_staff(&self) -> bool {
        self.with(false, |l| l.evaluator.is_staff())
    }

    pub fn is_relative(&self) -> bool {
        self.with(false, |l| l.evaluator.is_relative())
    }

    pub fn is_driver(&self) -> bool {
        self.with(false, |l| l.evaluator.is_driver())
    }

    pub fn role(&self) -> String {
        self.with(String::new(), |l| l.evaluator.role().to_string())
    }

    pub fn role_name(&self) -> &'static str {
        self.with("guest", |l| l.evaluator.role_name())
    }

    pub fn route_scope(&self) -> RouteScope {
        self.with(RouteScope::default(), |l| derive_route_scope(&l.user))
    }

    /// Guard honoring the configured [`AuthzMode`].
    pub fn require(&self, resource: &str, action: &str) -> AppResult<()> {
        if self.mode == AuthzMode::Off {
            return Ok(());
        }

        let outcome = self.with(Err(AppError::unauthorized("no session loaded")), |l| {
            l.evaluator.require(resource, action)
        });

        match outcome {
            Err(err) if self.mode == AuthzMode::Advisory => {
                tracing::warn!(
                    resource = %resource,
                    action = %action,
                    error = %err,
                    "advisory permission denial"
                );
                Ok(())
            }
            other => other,
        }
    }

    pub fn require_view(&self, resource: &str) -> AppResult<()> {
        self.require(resource, super::actions::VIEW)
    }

    pub fn require_create(&self, resource: &str) -> AppResult<()> {
        self.require(resource, super::actions::CREATE)
    }

    pub fn require_edit(&self, resource: &str) -> AppResult<()> {
        self.require(resource, super::actions::EDIT)
    }

    pub fn require_delete(&self, resource: &str) -> AppResult<()> {
        self.require(resource, super::actions::DELETE)
    }
}
