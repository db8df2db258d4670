//! Backend compatibility patches applied once when a session is loaded.
//!
//! Keep every patch here so it can be removed in one place when the backend
//! is fixed. Do not extend to other roles or resources without the same
//! confirmation from the backend side.

use crate::models::permission::{PermissionSet, Resource};
use crate::models::user::UserData;

use super::role::{resolve_role, EVALUATOR_CHAIN};
use super::roles;

/// The backend sends `view: false` for `visits` and `logs` to relatives even
/// though relatives must see both for their linked client. Forces the two
/// view flags on; create/edit/delete are left as received.
///
/// Returns whether the payload was changed.
pub fn apply_relative_view_patch(user: &mut UserData) -> bool {
    if resolve_role(EVALUATOR_CHAIN, user) != roles::RELATIVE {
        return false;
    }

    let mut changed = false;
    for resource in [Resource::Visits, Resource::Logs] {
        let Some(slot) = user.permissions.set_mut(resource) else {
            continue;
        };
        let set = slot.get_or_insert_with(PermissionSet::default);
        if !set.view {
            set.view = true;
            changed = true;
        }
    }

    if changed {
        tracing::debug!("relative view patch applied to visits and logs");
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::permission::UserPermissions;

    #[test]
    fn patch_ignores_other_roles() {
        let mut user = UserData {
            effective_role: Some("staff".into()),
            ..Default::default()
        };
        assert!(!apply_relative_view_patch(&mut user));
        assert_eq!(user.permissions, UserPermissions::default());
    }

    #[test]
    fn patch_creates_missing_grants_view_only() {
        let mut user = UserData {
            user_type: Some("relative".into()),
            ..Default::default()
        };
        assert!(apply_relative_view_patch(&mut user));
        assert_eq!(user.permissions.visits, Some(PermissionSet::view_only()));
        assert_eq!(user.permissions.logs, Some(PermissionSet::view_only()));
        assert!(user.permissions.clients.is_none());
    }

    #[test]
    fn patch_is_idempotent() {
        let mut user = UserData {
            effective_role: Some("relative".into()),
            ..Default::default()
        };
        apply_relative_view_patch(&mut user);
        assert!(!apply_relative_view_patch(&mut user));
    }
}
