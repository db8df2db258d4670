use std::sync::Arc;

use serde::Serialize;

use crate::authz::PermissionEvaluator;
use crate::models::permission::{Action, Resource};
use crate::models::user::UserData;

use super::LogoutHandle;

/// Screens of the unauthenticated flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntryScreen {
    Login,
    ForgotPassword,
    VerifyResetCode,
    ResetPassword,
}

impl EntryScreen {
    pub fn route_name(&self) -> &'static str {
        match self {
            EntryScreen::Login => "Login",
            EntryScreen::ForgotPassword => "ForgotPassword",
            EntryScreen::VerifyResetCode => "VerifyResetCode",
            EntryScreen::ResetPassword => "ResetPassword",
        }
    }

    /// Next step of the password-reset wizard; the last step returns to login.
    pub fn next(&self) -> EntryScreen {
        match self {
            EntryScreen::Login => EntryScreen::ForgotPassword,
            EntryScreen::ForgotPassword => EntryScreen::VerifyResetCode,
            EntryScreen::VerifyResetCode => EntryScreen::ResetPassword,
            EntryScreen::ResetPassword => EntryScreen::Login,
        }
    }
}

/// Feature screens reachable once signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Screen {
    ClientList,
    ClientDetails,
    AddClient,
    EditClient,
    StaffList,
    StaffDetails,
    AddStaff,
    EditStaff,
    VisitList,
    VisitDetails,
    ScheduleVisit,
    EditVisit,
    CareLogList,
    CareLogDetails,
    AddCareLog,
    TransportJobs,
    TransportDetails,
    AddTransportJob,
    Analytics,
    Profile,
    Settings,
    ChangePassword,
    Notifications,
}

/// Static declaration of a screen. The router does not enforce
/// `privileged_controls`; the screen checks them itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenSpec {
    pub screen: Screen,
    pub route_name: &'static str,
    pub title: &'static str,
    pub resource: Option<Resource>,
    pub privileged_controls: &'static [Action],
    pub receives_logout: bool,
}

const LIST_CONTROLS: &[Action] = &[Action::Create];
const DETAIL_CONTROLS: &[Action] = &[Action::Edit, Action::Delete];
const NO_CONTROLS: &[Action] = &[];

impl Screen {
    pub const ALL: [Screen; 23] = [
        Screen::ClientList,
        Screen::ClientDetails,
        Screen::AddClient,
        Screen::EditClient,
        Screen::StaffList,
        Screen::StaffDetails,
        Screen::AddStaff,
        Screen::EditStaff,
        Screen::VisitList,
        Screen::VisitDetails,
        Screen::ScheduleVisit,
        Screen::EditVisit,
        Screen::CareLogList,
        Screen::CareLogDetails,
        Screen::AddCareLog,
        Screen::TransportJobs,
        Screen::TransportDetails,
        Screen::AddTransportJob,
        Screen::Analytics,
        Screen::Profile,
        Screen::Settings,
        Screen::ChangePassword,
        Screen::Notifications,
    ];

    pub const fn spec(self) -> ScreenSpec {
        let (route_name, title, resource, privileged_controls, receives_logout) = match self {
            Screen::ClientList => ("ClientList", "Service Users", Some(Resource::Clients), LIST_CONTROLS, false),
            Screen::ClientDetails => ("ClientDetails", "Service User", Some(Resource::Clients), DETAIL_CONTROLS, false),
            Screen::AddClient => ("AddClient", "Add Service User", Some(Resource::Clients), NO_CONTROLS, false),
            Screen::EditClient => ("EditClient", "Edit Service User", Some(Resource::Clients), NO_CONTROLS, false),
            Screen::StaffList => ("StaffList", "Staff", Some(Resource::Staff), LIST_CONTROLS, false),
            Screen::StaffDetails => ("StaffDetails", "Staff Member", Some(Resource::Staff), DETAIL_CONTROLS, false),
            Screen::AddStaff => ("AddStaff", "Add Staff Member", Some(Resource::Staff), NO_CONTROLS, false),
            Screen::EditStaff => ("EditStaff", "Edit Staff Member", Some(Resource::Staff), NO_CONTROLS, false),
            Screen::VisitList => ("VisitList", "Visits", Some(Resource::Visits), LIST_CONTROLS, false),
            Screen::VisitDetails => ("VisitDetails", "Visit", Some(Resource::Visits), DETAIL_CONTROLS, false),
            Screen::ScheduleVisit => ("ScheduleVisit", "Schedule Visit", Some(Resource::Visits), NO_CONTROLS, false),
            Screen::EditVisit => ("EditVisit", "Edit Visit", Some(Resource::Visits), NO_CONTROLS, false),
            Screen::CareLogList => ("CareLogList", "Care Logs", Some(Resource::Logs), LIST_CONTROLS, false),
            Screen::CareLogDetails => ("CareLogDetails", "Care Log", Some(Resource::Logs), DETAIL_CONTROLS, false),
            Screen::AddCareLog => ("AddCareLog", "New Care Log", Some(Resource::Logs), NO_CONTROLS, false),
            Screen::TransportJobs => ("TransportJobs", "Transport", Some(Resource::Transport), LIST_CONTROLS, false),
            Screen::TransportDetails => ("TransportDetails", "Transport Job", Some(Resource::Transport), DETAIL_CONTROLS, false),
            Screen::AddTransportJob => ("AddTransportJob", "New Transport Job", Some(Resource::Transport), NO_CONTROLS, false),
            Screen::Analytics => ("Analytics", "Analytics", Some(Resource::Analytics), NO_CONTROLS, false),
            Screen::Profile => ("Profile", "My Profile", None, NO_CONTROLS, true),
            Screen::Settings => ("Settings", "Settings", None, NO_CONTROLS, true),
            Screen::ChangePassword => ("ChangePassword", "Change Password", None, NO_CONTROLS, false),
            Screen::Notifications => ("Notifications", "Notifications", None, NO_CONTROLS, false),
        };

        ScreenSpec {
            screen: self,
            route_name,
            title,
            resource,
            privileged_controls,
            receives_logout,
        }
    }

    pub fn from_route_name(name: &str) -> Option<Screen> {
        Screen::ALL.into_iter().find(|s| s.spec().route_name == name)
    }
}

/// Every feature screen in declaration order.
pub fn screen_catalog() -> impl Iterator<Item = ScreenSpec> {
    Screen::ALL.into_iter().map(Screen::spec)
}

impl ScreenSpec {
    /// Privileged controls this user should see on the screen.
    pub fn visible_controls(&self, evaluator: &PermissionEvaluator) -> Vec<Action> {
        let Some(resource) = self.resource else {
            return Vec::new();
        };

        self.privileged_controls
            .iter()
            .copied()
            .filter(|action| evaluator.allows(resource, *action))
            .collect()
    }
}

/// What a feature screen receives when opened.
#[derive(Debug)]
pub struct ScreenContext {
    pub spec: ScreenSpec,
    pub user: Arc<UserData>,
    pub logout: Option<LogoutHandle>,
}

/// What a dashboard receives when opened. Every dashboard can sign out.
#[derive(Debug)]
pub struct DashboardContext {
    pub dashboard: super::Dashboard,
    pub user: Arc<UserData>,
    pub logout: LogoutHandle,
}
