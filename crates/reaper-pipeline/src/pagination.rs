//! Paginated retrieval of a team's full public-channel set.

use reaper_client::{Channel, ChannelApi, Team};

use crate::pipeline::PipelineError;

/// Fetches every public channel of `team`, page by page, in listing order.
///
/// A page shorter than `page_size` marks the end of the listing and stops
/// the traversal without another request. A page of exactly `page_size` may
/// still be the last one, so one more request is issued; an empty follow-up
/// page then ends the traversal.
pub async fn fetch_all_public_channels(
    api: &dyn ChannelApi,
    team: &Team,
    page_size: usize,
) -> Result<Vec<Channel>, PipelineError> {
    let mut channels = Vec::new();
    let mut page = 0_usize;
    loop {
        let batch = api
            .public_channels_page(&team.id, page, page_size)
            .await
            .map_err(|source| PipelineError::ChannelFetch { page, source })?;
        let batch_len = batch.len();
        channels.extend(batch);
        if batch_len < page_size {
            break;
        }
        page += 1;
    }

    tracing::debug!(
        team = %team.name,
        channels = channels.len(),
        pages = page + 1,
        "fetched public channel listing"
    );
    Ok(channels)
}
