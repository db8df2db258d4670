use crate::errors::{AppError, AppResult};
use crate::models::permission::{Action, Resource, UserPermissions};
use crate::models::user::UserData;

use super::role::{resolve_role, Role, EVALUATOR_CHAIN};
use super::roles;

/// Answers "can this user perform action A on resource R?"
///
/// Built once from a [`UserData`] and never mutated. Every query is total:
/// unknown resources, unknown actions and missing grants all answer `false`.
///
/// Evaluation order for `can`:
/// 1. unknown resource or action -> deny
/// 2. analytics -> allow only `view`, and only if granted
/// 3. grant for the resource -> the flag for the action
/// 4. no grant -> deny
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionEvaluator {
    permissions: UserPermissions,
    role: String,
}

impl PermissionEvaluator {
    pub fn new(user: &UserData) -> Self {
        Self {
            permissions: user.permissions.clone(),
            role: resolve_role(EVALUATOR_CHAIN, user).to_string(),
        }
    }

    pub fn can(&self, resource: &str, action: &str) -> bool {
        match (resource.parse::<Resource>(), action.parse::<Action>()) {
            (Ok(resource), Ok(action)) => self.allows(resource, action),
            _ => {
                tracing::debug!(
                    role = %self.role,
                    resource = %resource,
                    action = %action,
                    "unknown resource or action"
                );
                false
            }
        }
    }

    /// Typed variant of [`can`](Self::can).
    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        let allowed = self.permissions.allows(resource, action);
        tracing::debug!(
            role = %self.role,
            resource = %resource,
            action = %action,
            allowed,
            "permission evaluated"
        );
        allowed
    }

    pub fn can_view(&self, resource: &str) -> bool {
        self.can(resource, Action::View.as_str())
    }

    pub fn can_create(&self, resource: &str) -> bool {
        self.can(resource, Action::Create.as_str())
    }

    pub fn can_edit(&self, resource: &str) -> bool {
        self.can(resource, Action::Edit.as_str())
    }

    pub fn can_delete(&self, resource: &str) -> bool {
        self.can(resource, Action::Delete.as_str())
    }

    /// Can see but not touch. A resource without view access is "no access",
    /// not read-only.
    pub fn is_read_only(&self, resource: &str) -> bool {
        self.can_view(resource)
            && !self.can_create(resource)
            && !self.can_edit(resource)
            && !self.can_delete(resource)
    }

    pub fn is_admin(&self) -> bool {
        self.role == roles::SUPER_ADMIN || self.role == roles::ADMIN
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == roles::SUPER_ADMIN
    }

    pub fn is_care_manager(&self) -> bool {
        self.role == roles::CARE_MANAGER
    }

    pub fn is_staff(&self) -> bool {
        self.role == roles::STAFF
    }

    pub fn is_relative(&self) -> bool {
        self.role == roles::RELATIVE
    }

    pub fn is_driver(&self) -> bool {
        self.role == roles::DRIVER
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn role_name(&self) -> &'static str {
        Role::parse(&self.role).map(|r| r.display_name()).unwrap_or("User")
    }

    pub fn permissions(&self) -> &UserPermissions {
        &self.permissions
    }

    /// Strict counterpart of [`can`](Self::can) for controllers that want a
    /// typed failure instead of a boolean.
    pub fn require(&self, resource: &str, action: &str) -> AppResult<()> {
        if self.can(resource, action) {
            return Ok(());
        }

        let role = if self.role.is_empty() { "user" } else { self.role.as_str() };
        Err(AppError::forbidden(format!("{role} may not {action} {resource}")))
    }

    pub fn require_view(&self, resource: &str) -> AppResult<()> {
        self.require(resource, Action::View.as_str())
    }

    pub fn require_create(&self, resource: &str) -> AppResult<()> {
        self.require(resource, Action::Create.as_str())
    }

    pub fn require_edit(&self, resource: &str) -> AppResult<()> {
        self.require(resource, Action::Edit.as_str())
    }

    pub fn require_delete(&self, resource: &str) -> AppResult<()> {
        self.require(resource, Action::Delete.as_str())
    }
}
