//! Decides whether a channel still sees genuine user activity.

use reaper_client::{Channel, ChannelApi};

use crate::pipeline::PipelineError;

/// Returns true when `channel` is old enough to judge and has no authored
/// post at or after `cutoff_ms`.
///
/// Channels created inside the inactivity window are never unused and no
/// post query is issued for them. System-generated posts (joins, leaves,
/// header edits) do not count as activity. The post history since the cutoff
/// is walked page by page; the scan stops at the first authored post.
pub async fn channel_is_unused(
    api: &dyn ChannelApi,
    channel: &Channel,
    cutoff_ms: i64,
    page_size: usize,
) -> Result<bool, PipelineError> {
    if channel.create_at >= cutoff_ms {
        tracing::debug!(
            channel = %channel.name,
            create_at = channel.create_at,
            "channel younger than the inactivity window"
        );
        return Ok(false);
    }

    let mut page = 0_usize;
    loop {
        let posts = api
            .posts_since_page(&channel.id, cutoff_ms, page, page_size)
            .await
            .map_err(|source| PipelineError::PostFetch {
                channel: channel.name.clone(),
                source,
            })?;

        if let Some(post) = posts
            .iter_ordered()
            .find(|post| post.is_user_post() && post.create_at >= cutoff_ms)
        {
            tracing::debug!(
                channel = %channel.name,
                post = %post.id,
                "found user post since cutoff"
            );
            return Ok(false);
        }
        if posts.len() < page_size {
            break;
        }
        page += 1;
    }

    tracing::debug!(channel = %channel.name, "no user post since cutoff");
    Ok(true)
}
