//! HTTP client for the session store and auth collaborators.
//!
//! Thin bearer-token JSON client over reqwest. Unauthorized responses map
//! to [`ApiError::AuthExpired`]; an unknown session id on update/check-tab
//! maps to [`ApiError::SessionNotFound`] so callers can treat the local
//! session as orphaned.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;
use crate::session::{NewSession, Profile, Session, SessionPatch};
use crate::stats::WeeklyBucket;

/// Request body for `POST /study/check-tab`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckTabRequest<'a> {
    session_id: &'a str,
    current_url: &'a str,
}

/// Response body of `POST /study/check-tab`.
#[derive(Debug, Deserialize)]
struct CheckTabResponse {
    #[serde(rename = "isAllowed")]
    is_allowed: bool,
}

/// Client for the study-session store and the auth/profile service.
#[derive(Debug, Clone)]
pub struct StudyClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl StudyClient {
    /// Create a client for the given API base URL (e.g.
    /// `http://localhost:5000/api`) and bearer token.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, ApiError> {
        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: trimmed.to_string(),
            token: token.into(),
        })
    }

    /// `GET /auth/profile`
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        let response = self
            .http
            .get(format!("{}/auth/profile", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response, None).await?.json().await?)
    }

    /// `POST /study` — create a session with zero duration.
    pub async fn create_session(
        &self,
        subject: &str,
        allowed_sites: &[String],
    ) -> Result<Session, ApiError> {
        let body = NewSession {
            subject,
            allowed_sites,
            duration: 0,
        };
        let response = self
            .http
            .post(format!("{}/study", self.base_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Ok(Self::check(response, None).await?.json().await?)
    }

    /// `GET /study` — list the user's sessions.
    pub async fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        let response = self
            .http
            .get(format!("{}/study", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response, None).await?.json().await?)
    }

    /// `GET /study/weekly` — Mon-Sun focus minutes.
    pub async fn weekly_focus(&self) -> Result<Vec<WeeklyBucket>, ApiError> {
        let response = self
            .http
            .get(format!("{}/study/weekly", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::check(response, None).await?.json().await?)
    }

    /// `PATCH /study/:id` — partial update; only provided fields change.
    pub async fn update_session(
        &self,
        id: &str,
        patch: &SessionPatch,
    ) -> Result<Session, ApiError> {
        let response = self
            .http
            .patch(format!("{}/study/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(response, Some(id)).await?.json().await?)
    }

    /// `POST /study/check-tab` — server-side allowlist check.
    ///
    /// The store runs the same matching algorithm as
    /// [`crate::allowlist::is_allowed`]; this call exists for wire
    /// compatibility, the local tab-change handler never depends on it.
    pub async fn check_tab(&self, session_id: &str, current_url: &str) -> Result<bool, ApiError> {
        let body = CheckTabRequest {
            session_id,
            current_url,
        };
        let response = self
            .http
            .post(format!("{}/study/check-tab", self.base_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let parsed: CheckTabResponse = Self::check(response, Some(session_id))
            .await?
            .json()
            .await?;
        Ok(parsed.is_allowed)
    }

    /// Map non-success statuses to the error taxonomy. `session_id` is the
    /// id a 404 refers to, for endpoints keyed by session.
    async fn check(
        response: reqwest::Response,
        session_id: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match (status.as_u16(), session_id) {
            (401, _) => Err(ApiError::AuthExpired),
            (404, Some(id)) => Err(ApiError::SessionNotFound { id: id.to_string() }),
            (code, _) => {
                let message = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: code,
                    message,
                })
            }
        }
    }
}
