use std::fmt;

use crate::models::user::UserData;

use super::roles;

/// The six effective roles known to the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    SuperAdmin,
    Admin,
    CareManager,
    Staff,
    Relative,
    Driver,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::CareManager,
        Role::Staff,
        Role::Relative,
        Role::Driver,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|r| r.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => roles::SUPER_ADMIN,
            Role::Admin => roles::ADMIN,
            Role::CareManager => roles::CARE_MANAGER,
            Role::Staff => roles::STAFF,
            Role::Relative => roles::RELATIVE,
            Role::Driver => roles::DRIVER,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Administrator",
            Role::Admin => "Administrator",
            Role::CareManager => "Care Manager",
            Role::Staff => "Care Staff",
            Role::Relative => "Family Member",
            Role::Driver => "Driver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One place a role string can live in a user payload.
///
/// Different backend endpoints put the role in different fields. This is a
/// compatibility shim for those payload shapes, resolved by walking a fixed
/// precedence list rather than by any per-shape dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSource {
    /// `effective_role`
    EffectiveRole,
    /// `user.role`
    NestedUserRole,
    /// `userType`
    UserType,
    /// `role`
    TopLevelRole,
}

impl RoleSource {
    /// Present and non-empty values only.
    pub fn extract(self, user: &UserData) -> Option<&str> {
        let raw = match self {
            RoleSource::EffectiveRole => user.effective_role.as_deref(),
            RoleSource::NestedUserRole => user.user.as_ref().and_then(|u| u.role.as_deref()),
            RoleSource::UserType => user.user_type.as_deref(),
            RoleSource::TopLevelRole => user.role.as_deref(),
        };
        raw.filter(|s| !s.is_empty())
    }
}

/// Precedence used by the permission evaluator.
pub const EVALUATOR_CHAIN: &[RoleSource] = &[RoleSource::EffectiveRole, RoleSource::UserType];

/// Precedence used for dashboard selection.
pub const ROUTER_CHAIN: &[RoleSource] = &[
    RoleSource::EffectiveRole,
    RoleSource::NestedUserRole,
    RoleSource::UserType,
    RoleSource::TopLevelRole,
];

/// First non-empty role along `chain`, or `""`.
pub fn resolve_role<'a>(chain: &[RoleSource], user: &'a UserData) -> &'a str {
    chain
        .iter()
        .find_map(|source| source.extract(user))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::NestedAccount;

    fn user() -> UserData {
        UserData {
            effective_role: Some("care_manager".into()),
            user: Some(NestedAccount { role: Some("admin".into()) }),
            user_type: Some("staff".into()),
            role: Some("driver".into()),
            ..Default::default()
        }
    }

    #[test]
    fn effective_role_wins_both_chains() {
        let u = user();
        assert_eq!(resolve_role(EVALUATOR_CHAIN, &u), "care_manager");
        assert_eq!(resolve_role(ROUTER_CHAIN, &u), "care_manager");
    }

    #[test]
    fn empty_effective_role_falls_through() {
        let mut u = user();
        u.effective_role = Some(String::new());
        assert_eq!(resolve_role(EVALUATOR_CHAIN, &u), "staff");
        assert_eq!(resolve_role(ROUTER_CHAIN, &u), "admin");
    }

    #[test]
    fn router_chain_reaches_top_level_role() {
        let u = UserData { role: Some("driver".into()), ..Default::default() };
        assert_eq!(resolve_role(ROUTER_CHAIN, &u), "driver");
        assert_eq!(resolve_role(EVALUATOR_CHAIN, &u), "");
    }

    #[test]
    fn display_names() {
        assert_eq!(Role::parse("care_manager").map(|r| r.display_name()), Some("Care Manager"));
        assert_eq!(Role::parse("relative").map(|r| r.display_name()), Some("Family Member"));
        assert!(Role::parse("Admin").is_none());
    }
}
