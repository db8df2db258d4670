//! Authorization core - permission evaluation, role resolution and scoping
//!
//! This module implements the client-side permission model:
//! - Per-resource view/create/edit/delete grants received at login
//! - Role resolution across inconsistent backend payload shapes
//! - List-scoping hints for relatives and rank-and-file staff
//! - A reactive wrapper that loads the grant from the session store
//! - Configurable enforcement for the strict guards (off/advisory/strict)
//!
//! Checks are advisory: the query methods never fail, they answer `false`.

mod compat;
mod evaluator;
mod hook;
mod role;
mod scope;

pub use compat::apply_relative_view_patch;
pub use evaluator::PermissionEvaluator;
pub use hook::{HookState, LoadedPermissions, PermissionHook};
pub use role::{resolve_role, Role, RoleSource, EVALUATOR_CHAIN, ROUTER_CHAIN};
pub use scope::{derive_route_scope, RouteScope};

use crate::errors::AppError;

/// Enforcement mode for the `require_*` guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthzMode {
    /// Guards always pass
    Off,
    /// Log denials but let the caller through
    Advisory,
    /// Denials become `AppError::Forbidden`
    #[default]
    Strict,
}

impl AuthzMode {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_lowercase().as_str() {
            "off" => Ok(AuthzMode::Off),
            "advisory" => Ok(AuthzMode::Advisory),
            "strict" | "" => Ok(AuthzMode::Strict),
            other => Err(AppError::configuration(format!(
                "AUTHZ_MODE must be one of off, advisory, strict (got {other})"
            ))),
        }
    }
}

/// Well-known role names
pub mod roles {
    pub const SUPER_ADMIN: &str = "super_admin";
    pub const ADMIN: &str = "admin";
    pub const CARE_MANAGER: &str = "care_manager";
    pub const STAFF: &str = "staff";
    pub const RELATIVE: &str = "relative";
    pub const DRIVER: &str = "driver";
}

/// Well-known resource names
pub mod resources {
    pub const CLIENTS: &str = "clients";
    pub const STAFF: &str = "staff";
    pub const VISITS: &str = "visits";
    pub const LOGS: &str = "logs";
    pub const TRANSPORT: &str = "transport";
    pub const ANALYTICS: &str = "analytics";
}

/// Well-known action names
pub mod actions {
    pub const VIEW: &str = "view";
    pub const CREATE: &str = "create";
    pub const EDIT: &str = "edit";
    pub const DELETE: &str = "delete";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing() {
        assert_eq!(AuthzMode::parse("OFF").unwrap(), AuthzMode::Off);
        assert_eq!(AuthzMode::parse(" advisory ").unwrap(), AuthzMode::Advisory);
        assert_eq!(AuthzMode::parse("").unwrap(), AuthzMode::Strict);
        assert!(AuthzMode::parse("lenient").is_err());
    }
}
