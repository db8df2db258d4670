use serde::Serialize;

use crate::models::user::{RecordId, UserData};

use super::role::{resolve_role, EVALUATOR_CHAIN};
use super::roles;

/// Hints a list screen applies before fetching. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteScope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<RecordId>,
    #[serde(rename = "isReadOnly", skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    #[serde(rename = "filterByUser", skip_serializing_if = "Option::is_none")]
    pub filter_by_user: Option<bool>,
}

impl RouteScope {
    pub fn is_unscoped(&self) -> bool {
        *self == RouteScope::default()
    }
}

/// Relatives see one client read-only, staff see their own records, every
/// other role sees everything.
pub fn derive_route_scope(user: &UserData) -> RouteScope {
    match resolve_role(EVALUATOR_CHAIN, user) {
        roles::RELATIVE => RouteScope {
            client_id: user.linked_client_id().cloned(),
            is_read_only: Some(true),
            ..Default::default()
        },
        roles::STAFF => RouteScope {
            staff_id: user.staff_id().cloned(),
            filter_by_user: Some(true),
            ..Default::default()
        },
        _ => RouteScope::default(),
    }
}
