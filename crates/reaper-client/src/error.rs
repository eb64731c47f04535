use thiserror::Error;

#[derive(Debug, Error)]
/// Failures surfaced by the Mattermost client.
pub enum MattermostError {
    #[error("login did not return a session token")]
    LoginFailed,
    #[error("team not found: {0}")]
    TeamNotFound(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
