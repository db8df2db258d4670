use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::models::lenient;
use crate::models::permission::UserPermissions;

/// Backend primary keys arrive either as integers or as strings depending on
/// the endpoint. Both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_i64()
                .map(RecordId::Int)
                .ok_or_else(|| D::Error::custom(format!("id is not an integer: {n}"))),
            Value::String(s) if !s.trim().is_empty() => Ok(RecordId::Text(s)),
            other => Err(D::Error::custom(format!("invalid id: {other}"))),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(i) => write!(f, "{i}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffRecord {
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Free-text job title, e.g. "Senior Carer" or "Driver".
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub staff_role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelativeRecord {
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub relative_id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Some endpoints wrap the account as `{"user": {"role": ...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestedAccount {
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// The authenticated identity as persisted under `userData`.
///
/// Every field decodes leniently; the only payloads rejected outright are
/// those that are not JSON objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Raw account category: `admin`, `staff`, `relative` or `driver`.
    #[serde(
        rename = "userType",
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_type: Option<String>,
    /// Authoritative role for permission and routing decisions.
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub effective_role: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_flag", skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(default, deserialize_with = "lenient::optional_flag", skip_serializing_if = "Option::is_none")]
    pub is_super_admin: Option<bool>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub staff: Option<StaffRecord>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub relative: Option<RelativeRecord>,
    /// A relative's linked client.
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub permissions: UserPermissions,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub user: Option<NestedAccount>,
}

impl UserData {
    /// Decode a persisted payload. Errors name the JSON path that failed.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> AppResult<Self> {
        if !value.is_object() {
            return Err(AppError::serialization("user payload is not a JSON object"));
        }

        serde_path_to_error::deserialize(value)
            .map_err(|err| AppError::serialization(format!("{} at {}", err.inner(), err.path())))
    }

    /// Linked client for relatives, preferring the top-level field.
    pub fn linked_client_id(&self) -> Option<&RecordId> {
        self.client_id
            .as_ref()
            .or_else(|| self.relative.as_ref().and_then(|r| r.client_id.as_ref()))
    }

    pub fn staff_id(&self) -> Option<&RecordId> {
        self.staff.as_ref().and_then(|s| s.staff_id.as_ref())
    }

    pub fn job_title(&self) -> Option<&str> {
        self.staff.as_ref().and_then(|s| s.staff_role.as_deref())
    }

    /// Best human-readable name: staff names, then relative names, then email.
    pub fn display_name(&self) -> String {
        let join = |first: &Option<String>, last: &Option<String>| {
            let full = [first.as_deref(), last.as_deref()]
                .into_iter()
                .flatten()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            (!full.is_empty()).then_some(full)
        };

        self.staff
            .as_ref()
            .and_then(|s| join(&s.first_name, &s.last_name))
            .or_else(|| self.relative.as_ref().and_then(|r| join(&r.first_name, &r.last_name)))
            .or_else(|| self.email.clone())
            .unwrap_or_default()
    }
}

/// Result of the remote login call. Fields are kept loose because the
/// router validates the token shape itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}
