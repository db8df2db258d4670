use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::lenient;

// =============================================================================
// VOCABULARY
// =============================================================================

/// Resources a grant can cover. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Clients,
    Staff,
    Visits,
    Logs,
    Transport,
    Analytics,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Clients,
        Resource::Staff,
        Resource::Visits,
        Resource::Logs,
        Resource::Transport,
        Resource::Analytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Clients => "clients",
            Resource::Staff => "staff",
            Resource::Visits => "visits",
            Resource::Logs => "logs",
            Resource::Transport => "transport",
            Resource::Analytics => "analytics",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| AppError::bad_request(format!("unknown resource: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| AppError::bad_request(format!("unknown action: {s}")))
    }
}

// =============================================================================
// GRANTS
// =============================================================================

/// Per-resource grant. All four flags are always present after decoding;
/// anything the backend omitted reads as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub view: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub create: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub edit: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub delete: bool,
}

impl PermissionSet {
    pub fn all() -> Self {
        Self { view: true, create: true, edit: true, delete: true }
    }

    pub fn view_only() -> Self {
        Self { view: true, ..Self::default() }
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Create => self.create,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
        }
    }
}

/// Analytics has no create/edit/delete concept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsPermission {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub view: bool,
}

/// The grant received at login. A missing resource means no access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermissions {
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub clients: Option<PermissionSet>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub staff: Option<PermissionSet>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub visits: Option<PermissionSet>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub logs: Option<PermissionSet>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub transport: Option<PermissionSet>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsPermission>,
}

impl UserPermissions {
    /// Full grant for a CRUD resource. Analytics is not a CRUD resource and
    /// always yields `None` here.
    pub fn set(&self, resource: Resource) -> Option<&PermissionSet> {
        match resource {
            Resource::Clients => self.clients.as_ref(),
            Resource::Staff => self.staff.as_ref(),
            Resource::Visits => self.visits.as_ref(),
            Resource::Logs => self.logs.as_ref(),
            Resource::Transport => self.transport.as_ref(),
            Resource::Analytics => None,
        }
    }

    pub fn set_mut(&mut self, resource: Resource) -> Option<&mut Option<PermissionSet>> {
        match resource {
            Resource::Clients => Some(&mut self.clients),
            Resource::Staff => Some(&mut self.staff),
            Resource::Visits => Some(&mut self.visits),
            Resource::Logs => Some(&mut self.logs),
            Resource::Transport => Some(&mut self.transport),
            Resource::Analytics => None,
        }
    }

    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        match resource {
            Resource::Analytics => {
                action == Action::View && self.analytics.map(|a| a.view).unwrap_or(false)
            }
            other => self.set(other).map(|set| set.allows(action)).unwrap_or(false),
        }
    }
}
