use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::interfaces::identity::{
    IdentityError, IdentityProvider, IdentityResult, IdentitySession,
};

/// HTTP client for a GoTrue-style identity service (the kind Supabase
/// exposes under /auth/v1). All provider error codes are translated into
/// `IdentityError` here; nothing above this layer matches on strings.
pub struct GotrueClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SessionResp {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<UserResp>,
    // signup without auto-confirm returns the bare user object
    id: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserResp {
    id: String,
    email: Option<String>,
    user_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorResp {
    error_code: Option<String>,
    #[serde(alias = "message", alias = "error_description")]
    msg: Option<String>,
}

impl GotrueClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_transport_error(err: reqwest::Error) -> IdentityError {
        if err.is_connect() || err.is_timeout() {
            return IdentityError::Network;
        }
        IdentityError::Other(err.into())
    }

    async fn map_error_response(resp: reqwest::Response, context: &str) -> IdentityError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let parsed: Option<ErrorResp> = serde_json::from_str(&body).ok();
        let error_code = parsed.as_ref().and_then(|e| e.error_code.clone());
        let msg = parsed.as_ref().and_then(|e| e.msg.clone());

        warn!(
            status = %status,
            error_code = ?error_code,
            msg = ?msg,
            context = %context,
            "identity provider request rejected"
        );

        if status == StatusCode::TOO_MANY_REQUESTS {
            return IdentityError::TooManyRequests;
        }

        match error_code.as_deref() {
            Some("email_exists") | Some("user_already_exists") => IdentityError::EmailAlreadyInUse,
            Some("validation_failed") | Some("email_address_invalid") => {
                IdentityError::InvalidEmail
            }
            Some("weak_password") => IdentityError::WeakPassword,
            Some("invalid_credentials") | Some("invalid_grant") => {
                IdentityError::InvalidCredentials
            }
            Some("over_request_rate_limit") => IdentityError::TooManyRequests,
            _ => {
                error!(
                    status = %status,
                    response_body = %body,
                    context = %context,
                    "unrecognized identity provider error"
                );
                IdentityError::Other(anyhow!(
                    "identity provider request failed: {} (status {})",
                    context,
                    status
                ))
            }
        }
    }

    fn session_from_resp(resp: SessionResp, context: &str) -> IdentityResult<IdentitySession> {
        let (id, email, display_name) = match resp.user {
            Some(user) => {
                let display_name = user
                    .user_metadata
                    .as_ref()
                    .and_then(|meta| meta.get("full_name").or_else(|| meta.get("name")))
                    .and_then(|value| value.as_str())
                    .map(|value| value.to_string());
                (user.id, user.email, display_name)
            }
            None => {
                let id = resp
                    .id
                    .ok_or_else(|| anyhow!("identity response missing user id ({})", context))?;
                (id, resp.email, None)
            }
        };

        let user_id = Uuid::parse_str(&id)
            .map_err(|_| IdentityError::Other(anyhow!("non-uuid user id from provider: {}", id)))?;

        Ok(IdentitySession {
            user_id,
            email: email.unwrap_or_default(),
            display_name,
            access_token: resp.access_token.unwrap_or_default(),
            refresh_token: resp.refresh_token,
        })
    }

    async fn post_session(
        &self,
        path: &str,
        body: serde_json::Value,
        context: &str,
    ) -> IdentityResult<IdentitySession> {
        let resp = self
            .http
            .post(self.endpoint(path))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !resp.status().is_success() {
            return Err(Self::map_error_response(resp, context).await);
        }

        let parsed: SessionResp = resp
            .json()
            .await
            .map_err(|err| IdentityError::Other(err.into()))?;
        Self::session_from_resp(parsed, context)
    }

    async fn post_no_content(
        &self,
        path: &str,
        body: serde_json::Value,
        context: &str,
    ) -> IdentityResult<()> {
        let resp = self
            .http
            .post(self.endpoint(path))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !resp.status().is_success() {
            return Err(Self::map_error_response(resp, context).await);
        }

        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for GotrueClient {
    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<IdentitySession> {
        self.post_session(
            "/signup",
            json!({ "email": email, "password": password }),
            "sign up",
        )
        .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<IdentitySession> {
        self.post_session(
            "/token?grant_type=password",
            json!({ "email": email, "password": password }),
            "sign in",
        )
        .await
    }

    async fn sign_in_with_google(&self, id_token: &str) -> IdentityResult<IdentitySession> {
        self.post_session(
            "/token?grant_type=id_token",
            json!({ "id_token": id_token, "provider": "google" }),
            "google sign in",
        )
        .await
    }

    async fn send_password_reset(&self, email: &str) -> IdentityResult<()> {
        self.post_no_content("/recover", json!({ "email": email }), "password reset")
            .await
    }

    async fn send_email_verification(&self, email: &str) -> IdentityResult<()> {
        self.post_no_content(
            "/resend",
            json!({ "type": "signup", "email": email }),
            "email verification",
        )
        .await
    }

    async fn update_display_name(&self, user_id: Uuid, display_name: &str) -> IdentityResult<()> {
        let resp = self
            .http
            .put(self.endpoint(&format!("/admin/users/{}", user_id)))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({ "user_metadata": { "full_name": display_name } }))
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !resp.status().is_success() {
            return Err(Self::map_error_response(resp, "update display name").await);
        }

        Ok(())
    }
}
