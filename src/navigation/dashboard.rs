use serde::Serialize;

use crate::authz::{resolve_role, roles, ROUTER_CHAIN};
use crate::models::user::UserData;

use super::screens::EntryScreen;

/// Role-specific landing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dashboard {
    SuperAdmin,
    Admin,
    CareManager,
    Relative,
    Driver,
    Staff,
}

impl Dashboard {
    pub fn route_name(&self) -> &'static str {
        match self {
            Dashboard::SuperAdmin => "SuperAdminDashboard",
            Dashboard::Admin => "AdminDashboard",
            Dashboard::CareManager => "CareManagerDashboard",
            Dashboard::Relative => "RelativeDashboard",
            Dashboard::Driver => "DriverDashboard",
            Dashboard::Staff => "StaffDashboard",
        }
    }
}

/// Where the app lands on launch or after a session transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Destination {
    Entry(EntryScreen),
    Dashboard(Dashboard),
}

impl Destination {
    pub fn route_name(&self) -> &'static str {
        match self {
            Destination::Entry(entry) => entry.route_name(),
            Destination::Dashboard(dashboard) => dashboard.route_name(),
        }
    }
}

const DRIVER_TITLE_MARKER: &str = "driver";

/// No user goes to the login entry; otherwise the dashboard for the user.
pub fn select_dashboard(user: Option<&UserData>) -> Destination {
    match user {
        Some(user) => Destination::Dashboard(dashboard_for(user)),
        None => Destination::Entry(EntryScreen::Login),
    }
}

/// Priority order:
/// 1. super_admin
/// 2. admin
/// 3. care_manager
/// 4. relative
/// 5. driver, or any other role whose job title mentions "driver"
/// 6. staff (default)
///
/// An explicit `driver` role always wins; the job title is only sniffed for
/// accounts that were not tagged as drivers.
pub fn dashboard_for(user: &UserData) -> Dashboard {
    match resolve_role(ROUTER_CHAIN, user) {
        roles::SUPER_ADMIN => Dashboard::SuperAdmin,
        roles::ADMIN => Dashboard::Admin,
        roles::CARE_MANAGER => Dashboard::CareManager,
        roles::RELATIVE => Dashboard::Relative,
        roles::DRIVER => Dashboard::Driver,
        _ if has_driver_title(user) => Dashboard::Driver,
        _ => Dashboard::Staff,
    }
}

fn has_driver_title(user: &UserData) -> bool {
    user.job_title()
        .map(|title| title.to_lowercase().contains(DRIVER_TITLE_MARKER))
        .unwrap_or(false)
}
