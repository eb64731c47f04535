use async_trait::async_trait;

use crate::{Channel, MattermostError, PostList, Team};

/// Remote operations the archive pipeline consumes.
///
/// Implemented by an authenticated [`crate::Session`]; pipeline tests supply
/// scripted implementations instead of a live server.
#[async_trait]
pub trait ChannelApi: Send + Sync {
    /// Resolves a team by its URL name.
    async fn team_by_name(&self, name: &str) -> Result<Team, MattermostError>;

    /// Fetches one page of the team's public channels.
    async fn public_channels_page(
        &self,
        team_id: &str,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<Channel>, MattermostError>;

    /// Fetches one page of posts created at or after `since_ms`.
    async fn posts_since_page(
        &self,
        channel_id: &str,
        since_ms: i64,
        page: usize,
        per_page: usize,
    ) -> Result<PostList, MattermostError>;

    /// Soft-deletes a channel. Returns the service-reported success flag.
    async fn archive_channel(&self, channel_id: &str) -> Result<bool, MattermostError>;
}
