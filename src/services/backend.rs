// src/services/backend.rs

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::common::config::AppConfig;
use crate::common::safe_email_log;
use crate::profile::models::{Role, UserAccount, UserProfile};
use crate::session::store::ProfileSync;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    SignUpRejected(String),

    #[error("account is registered but has no profile row")]
    ProfileRowMissing,

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct AuthSession {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl AuthErrorBody {
    fn message(self, fallback: &str) -> String {
        self.msg
            .or(self.error_description)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// One row of the remote `profiles` table.
#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    email: String,
    role: Role,
    created_at: String,
    profile_data: UserProfile,
}

impl From<ProfileRow> for UserAccount {
    fn from(row: ProfileRow) -> Self {
        UserAccount {
            id: row.id,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
            profile: row.profile_data,
        }
    }
}

// ============================================================================
// Service
// ============================================================================

/// Client of the hosted REST+Auth backend. Every call is a single-shot HTTP
/// request carrying the static API key; authenticated calls add the user's
/// bearer token. No pagination, no rate limiting, no retry.
pub struct BackendService {
    client: Client,
    base_url: String,
    api_key: String,
    admin_emails: HashSet<String>,
    /// Bearer for the logged-in user; anonymous requests fall back to the
    /// API key, mirroring the backend's anonymous-role convention.
    token: RwLock<Option<String>>,
}

impl BackendService {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder().build().unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            api_key: config.backend_api_key.clone(),
            admin_emails: config.admin_emails.clone(),
            token: RwLock::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn bearer(&self) -> String {
        self.token
            .read()
            .await
            .clone()
            .unwrap_or_else(|| self.api_key.clone())
    }

    /// Forget the stored bearer token on logout.
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    /// Create an identity and seed its profile row. The seeded profile is
    /// empty apart from the account email and the initial credit balance.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<UserAccount, BackendError> {
        debug!(email = %safe_email_log(email), "Creating account");

        let response = self
            .client
            .post(self.url("auth/v1/signup"))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: AuthErrorBody = response.json().await.unwrap_or_default();
            let message = body.message(&format!("sign-up rejected with HTTP {}", status));
            warn!(status = %status, "Sign-up rejected by auth backend");
            return Err(BackendError::SignUpRejected(message));
        }

        let session: AuthSession = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        *self.token.write().await = Some(session.access_token.clone());

        let role = if self.admin_emails.contains(&email.to_lowercase()) {
            Role::Admin
        } else {
            Role::User
        };
        let mut profile = UserProfile::default();
        profile.personal_info.email = email.to_string();

        let rows = self
            .insert_profile_row(&session.user.id, email, role, &profile)
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::InvalidResponse("empty insert response".to_string()))?;

        info!(user_id = %row.id, "Account created and profile row seeded");
        Ok(row.into())
    }

    async fn insert_profile_row(
        &self,
        user_id: &str,
        email: &str,
        role: Role,
        profile: &UserProfile,
    ) -> Result<Vec<ProfileRow>, BackendError> {
        let response = self
            .client
            .post(self.url("rest/v1/profiles"))
            .header("apikey", &self.api_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer().await)
            .json(&json!({
                "id": user_id,
                "email": email,
                "role": role,
                "profile_data": profile,
            }))
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Profile row insert failed");
            return Err(BackendError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// Exchange credentials for a token and fetch the caller's profile row.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserAccount, BackendError> {
        debug!(email = %safe_email_log(email), "Exchanging credentials for a token");

        let response = self
            .client
            .post(self.url("auth/v1/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: AuthErrorBody = response.json().await.unwrap_or_default();
            warn!(status = %status, email = %safe_email_log(email), "Login rejected");
            return Err(BackendError::InvalidCredentials(
                body.message("Incorrect email or password"),
            ));
        }

        let session: AuthSession = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        *self.token.write().await = Some(session.access_token.clone());

        let rows = self.fetch_profile_rows(Some(session.user.id.as_str())).await?;
        let row = rows.into_iter().next().ok_or(BackendError::ProfileRowMissing)?;

        info!(user_id = %row.id, "Login succeeded");
        Ok(row.into())
    }

    async fn fetch_profile_rows(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<ProfileRow>, BackendError> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        if let Some(id) = user_id {
            query.push(("id", format!("eq.{}", id)));
        }

        let response = self
            .client
            .get(self.url("rest/v1/profiles"))
            .query(&query)
            .header("apikey", &self.api_key)
            .bearer_auth(self.bearer().await)
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Profile fetch failed");
            return Err(BackendError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// Patch the profile row with the full payload. Last write wins.
    pub async fn update_profile(
        &self,
        user_id: &str,
        profile: &UserProfile,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .patch(self.url("rest/v1/profiles"))
            .query(&[("id", format!("eq.{}", user_id))])
            .header("apikey", &self.api_key)
            .bearer_auth(self.bearer().await)
            .json(&json!({ "profile_data": profile }))
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BackendError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        debug!(user_id = %user_id, "Profile row updated");
        Ok(())
    }

    /// Full scan of the profiles table. Admin panel only.
    pub async fn list_users(&self) -> Result<Vec<UserAccount>, BackendError> {
        let rows = self.fetch_profile_rows(None).await?;
        info!(user_count = rows.len(), "Fetched user table");
        Ok(rows.into_iter().map(UserAccount::from).collect())
    }
}

#[async_trait]
impl ProfileSync for BackendService {
    async fn push_profile(
        &self,
        user_id: &str,
        profile: &UserProfile,
    ) -> Result<(), BackendError> {
        self.update_profile(user_id, profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> AppConfig {
        AppConfig {
            backend_url: base_url.to_string(),
            backend_api_key: "anon-key".to_string(),
            admin_emails: ["admin@taqdeem.com".to_string()].into_iter().collect(),
            generative_base_url: "http://unused".to_string(),
            generative_api_key: "unused".to_string(),
            generative_model: "unused".to_string(),
            session_cache_path: "./unused.json".into(),
        }
    }

    fn profile_row_json(id: &str, email: &str, role: &str) -> Value {
        json!({
            "id": id,
            "email": email,
            "role": role,
            "created_at": "2026-02-01T08:00:00Z",
            "profile_data": serde_json::to_value(UserProfile::default()).expect("serializes"),
        })
    }

    #[tokio::test]
    async fn test_login_fetches_profile_row() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "user-token",
                "user": { "id": "u-1" },
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/profiles"))
            .and(query_param("id", "eq.u-1"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([profile_row_json("u-1", "huda@example.com", "user")])),
            )
            .mount(&server)
            .await;

        let backend = BackendService::new(&test_config(&server.uri()));
        let account = backend
            .login("huda@example.com", "secret")
            .await
            .expect("login succeeds");

        assert_eq!(account.id, "u-1");
        assert_eq!(account.email, "huda@example.com");
        assert!(!account.is_admin());
    }

    #[tokio::test]
    async fn test_login_surfaces_server_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error_description": "Invalid login credentials",
            })))
            .mount(&server)
            .await;

        let backend = BackendService::new(&test_config(&server.uri()));
        let error = backend
            .login("huda@example.com", "wrong")
            .await
            .expect_err("login fails");

        match error {
            BackendError::InvalidCredentials(message) => {
                assert_eq!(message, "Invalid login credentials");
            }
            other => panic!("expected InvalidCredentials, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_without_profile_row_is_distinct_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "user-token",
                "user": { "id": "u-2" },
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/profiles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let backend = BackendService::new(&test_config(&server.uri()));
        let error = backend
            .login("huda@example.com", "secret")
            .await
            .expect_err("login fails");

        assert!(matches!(error, BackendError::ProfileRowMissing));
    }

    #[tokio::test]
    async fn test_sign_up_seeds_profile_row_with_role() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh-token",
                "user": { "id": "u-3" },
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/profiles"))
            .and(header("prefer", "return=representation"))
            .and(body_partial_json(json!({
                "id": "u-3",
                "email": "admin@taqdeem.com",
                "role": "admin",
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!([profile_row_json(
                    "u-3",
                    "admin@taqdeem.com",
                    "admin"
                )])),
            )
            .mount(&server)
            .await;

        let backend = BackendService::new(&test_config(&server.uri()));
        let account = backend
            .sign_up("admin@taqdeem.com", "secret")
            .await
            .expect("sign-up succeeds");

        assert!(account.is_admin());
    }

    #[tokio::test]
    async fn test_update_profile_patches_row() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/profiles"))
            .and(query_param("id", "eq.u-1"))
            .and(body_partial_json(json!({
                "profile_data": { "activity": { "credits": 3 } },
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let backend = BackendService::new(&test_config(&server.uri()));
        backend
            .update_profile("u-1", &UserProfile::default())
            .await
            .expect("update succeeds");
    }

    #[tokio::test]
    async fn test_list_users_maps_rows() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/profiles"))
            .and(query_param("select", "*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                profile_row_json("u-1", "huda@example.com", "user"),
                profile_row_json("u-2", "admin@taqdeem.com", "admin"),
            ])))
            .mount(&server)
            .await;

        let backend = BackendService::new(&test_config(&server.uri()));
        let users = backend.list_users().await.expect("list succeeds");

        assert_eq!(users.len(), 2);
        assert!(users[1].is_admin());
    }
}
