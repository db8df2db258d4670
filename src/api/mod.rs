//! Thin client for the remote care-management API.
//!
//! Only the pieces the session core depends on live here: the login call,
//! and authenticated reads that end the session when the backend rejects
//! the token.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::models::user::{LoginRequest, LoginResponse};
use crate::navigation::SessionRouter;

pub const LOGIN_PATH: &str = "auth/login.php";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    router: SessionRouter,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, router: SessionRouter) -> AppResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AppError::configuration("API base URL must not be empty"));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()?;

        Ok(Self { http, base_url, router })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Call the login endpoint. A successful response is handed to the
    /// router; an unsuccessful one is returned as-is for the caller to show.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let response = self
            .http
            .post(self.url(LOGIN_PATH))
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let login: LoginResponse = match serde_json::from_str(&body) {
            Ok(login) => login,
            Err(_) if !status.is_success() => {
                return Err(AppError::http(format!("login returned {status}")));
            }
            Err(err) => return Err(err.into()),
        };

        if !login.success {
            tracing::info!(status = status.as_u16(), "login refused by backend");
            return Ok(login);
        }

        if !self.router.complete_login(&login).await {
            return Err(AppError::internal("login succeeded but the session could not be established"));
        }

        Ok(login)
    }

    /// Authenticated GET. A 401 ends the local session.
    pub async fn get_json(&self, path: &str) -> AppResult<Value> {
        let token = self
            .router
            .repository()
            .load_token()
            .await?
            .ok_or_else(|| AppError::unauthorized("not signed in"))?;

        let response = self.http.get(self.url(path)).bearer_auth(&token).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path = %path, "backend rejected session token, signing out");
            self.router.logout().await;
            return Err(AppError::unauthorized("session expired"));
        }

        if !status.is_success() {
            return Err(AppError::http(format!("{path} returned {status}")));
        }

        Ok(response.json::<Value>().await?)
    }
}
