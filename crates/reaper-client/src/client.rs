//! HTTP client construction, login, and the authenticated session handle.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::retry::{
    is_retryable_status, is_retryable_transport_error, parse_retry_after, retry_delay,
    truncate_for_error,
};
use crate::{Channel, ChannelApi, MattermostError, PostList, Team};

// Mattermost returns the session token in this response header on login.
const SESSION_TOKEN_HEADER: &str = "Token";

const ERROR_BODY_MAX_CHARS: usize = 800;

#[derive(Debug, Clone, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: String,
}

#[derive(Clone)]
/// Unauthenticated entry point; its only job is to produce a [`Session`].
pub struct MattermostClient {
    http: reqwest::Client,
    api_base: String,
    retry_max_attempts: usize,
    retry_base_delay_ms: u64,
}

impl MattermostClient {
    pub fn new(
        server_url: &str,
        request_timeout_ms: u64,
        retry_max_attempts: usize,
        retry_base_delay_ms: u64,
    ) -> Result<Self, MattermostError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("channel-reaper"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()?;

        Ok(Self {
            http,
            api_base: format!("{}/api/v4", server_url.trim_end_matches('/')),
            retry_max_attempts: retry_max_attempts.max(1),
            retry_base_delay_ms: retry_base_delay_ms.max(1),
        })
    }

    /// Logs in and hands the caller the session handle all further calls go
    /// through. The handle must be given back via [`Session::logout`].
    pub async fn login(
        &self,
        login_id: &str,
        password: &str,
    ) -> Result<Session, MattermostError> {
        let payload = json!({
            "login_id": login_id,
            "password": password,
        });
        let response = send_with_retry(
            "users.login",
            self.retry_max_attempts,
            self.retry_base_delay_ms,
            || {
                self.http
                    .post(format!("{}/users/login", self.api_base))
                    .json(&payload)
            },
        )
        .await;

        let response = match response {
            Ok(response) => response,
            Err(MattermostError::HttpStatus { status: 401, .. }) => {
                return Err(MattermostError::LoginFailed)
            }
            Err(error) => return Err(error),
        };

        let token = response
            .headers()
            .get(SESSION_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
            .ok_or(MattermostError::LoginFailed)?;

        Ok(Session {
            http: self.http.clone(),
            api_base: self.api_base.clone(),
            token,
            retry_max_attempts: self.retry_max_attempts,
            retry_base_delay_ms: self.retry_base_delay_ms,
        })
    }
}

/// Scoped authentication handle. Owns the bearer token; every API operation
/// requires it, and [`Session::logout`] consumes it, so the session cannot
/// be used after release.
#[derive(Debug)]
pub struct Session {
    http: reqwest::Client,
    api_base: String,
    token: String,
    retry_max_attempts: usize,
    retry_base_delay_ms: u64,
}

impl Session {
    /// Invalidates the server-side session and consumes the handle.
    pub async fn logout(self) -> Result<(), MattermostError> {
        send_with_retry(
            "users.logout",
            self.retry_max_attempts,
            self.retry_base_delay_ms,
            || {
                self.http
                    .post(format!("{}/users/logout", self.api_base))
                    .bearer_auth(&self.token)
            },
        )
        .await?;
        Ok(())
    }

    async fn get_json<T, F>(&self, operation: &str, builder: F) -> Result<T, MattermostError>
    where
        T: DeserializeOwned,
        F: FnMut() -> reqwest::RequestBuilder,
    {
        let response = send_with_retry(
            operation,
            self.retry_max_attempts,
            self.retry_base_delay_ms,
            builder,
        )
        .await?;
        response.json::<T>().await.map_err(|error| {
            MattermostError::InvalidResponse(format!("failed to decode {operation}: {error}"))
        })
    }
}

#[async_trait]
impl ChannelApi for Session {
    async fn team_by_name(&self, name: &str) -> Result<Team, MattermostError> {
        let url = format!("{}/teams/name/{name}", self.api_base);
        let result = self
            .get_json("teams.getByName", || {
                self.http.get(&url).bearer_auth(&self.token)
            })
            .await;
        match result {
            Err(MattermostError::HttpStatus { status: 404, .. }) => {
                Err(MattermostError::TeamNotFound(name.to_string()))
            }
            other => other,
        }
    }

    async fn public_channels_page(
        &self,
        team_id: &str,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<Channel>, MattermostError> {
        let url = format!("{}/teams/{team_id}/channels", self.api_base);
        self.get_json("teams.getPublicChannels", || {
            self.http.get(&url).bearer_auth(&self.token).query(&[
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
        })
        .await
    }

    async fn posts_since_page(
        &self,
        channel_id: &str,
        since_ms: i64,
        page: usize,
        per_page: usize,
    ) -> Result<PostList, MattermostError> {
        let url = format!("{}/channels/{channel_id}/posts", self.api_base);
        self.get_json("channels.getPostsSince", || {
            self.http.get(&url).bearer_auth(&self.token).query(&[
                ("since", since_ms.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
        })
        .await
    }

    async fn archive_channel(&self, channel_id: &str) -> Result<bool, MattermostError> {
        let url = format!("{}/channels/{channel_id}", self.api_base);
        let response: StatusResponse = self
            .get_json("channels.delete", || {
                self.http.delete(&url).bearer_auth(&self.token)
            })
            .await?;
        Ok(response.status.eq_ignore_ascii_case("OK"))
    }
}

async fn send_with_retry<F>(
    operation: &str,
    retry_max_attempts: usize,
    retry_base_delay_ms: u64,
    mut builder: F,
) -> Result<reqwest::Response, MattermostError>
where
    F: FnMut() -> reqwest::RequestBuilder,
{
    let mut attempt = 0_usize;
    loop {
        attempt = attempt.saturating_add(1);
        let response = builder()
            .header("x-reaper-retry-attempt", attempt.saturating_sub(1).to_string())
            .send()
            .await;
        match response {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response);
                }

                let retry_after = parse_retry_after(response.headers());
                if attempt < retry_max_attempts && is_retryable_status(status.as_u16()) {
                    tracing::debug!(
                        operation,
                        status = status.as_u16(),
                        attempt,
                        "retrying request"
                    );
                    tokio::time::sleep(retry_delay(retry_base_delay_ms, attempt, retry_after))
                        .await;
                    continue;
                }

                let body = response.text().await.unwrap_or_default();
                return Err(MattermostError::HttpStatus {
                    status: status.as_u16(),
                    body: truncate_for_error(&body, ERROR_BODY_MAX_CHARS),
                });
            }
            Err(error) => {
                if attempt < retry_max_attempts && is_retryable_transport_error(&error) {
                    tracing::debug!(operation, attempt, "retrying after transport error");
                    tokio::time::sleep(retry_delay(retry_base_delay_ms, attempt, None)).await;
                    continue;
                }
                return Err(MattermostError::Http(error));
            }
        }
    }
}
