//! Authenticated Mattermost REST v4 client used by the archive pipeline.
//!
//! The client is split into an unauthenticated [`MattermostClient`] that can
//! only log in, and a [`Session`] handle that owns the bearer token, carries
//! every API operation, and is consumed by [`Session::logout`].

mod api;
mod client;
mod error;
mod retry;
mod types;

pub use api::ChannelApi;
pub use client::{MattermostClient, Session};
pub use error::MattermostError;
pub use types::{Channel, Post, PostList, Team};
