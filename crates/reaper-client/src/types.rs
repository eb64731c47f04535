use std::collections::HashMap;

use serde::Deserialize;

// Authored posts carry an empty type tag; system bookkeeping posts (joins,
// leaves, header edits) carry a `system_*` value.
const USER_POST_TYPE: &str = "";

#[derive(Debug, Clone, Deserialize)]
/// A team, resolved once per run by name lookup.
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
/// Snapshot of a channel as returned by the channel listing endpoints.
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    /// Creation instant in epoch milliseconds.
    #[serde(default)]
    pub create_at: i64,
    /// `"O"` marks a public channel.
    #[serde(rename = "type", default)]
    pub channel_type: String,
}

#[derive(Debug, Clone, Deserialize)]
/// A single post inside a channel.
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub create_at: i64,
    #[serde(rename = "type", default)]
    pub post_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: String,
}

impl Post {
    /// True for authored content, false for system-generated events.
    pub fn is_user_post(&self) -> bool {
        self.post_type == USER_POST_TYPE
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
/// One page of posts. `order` holds post ids in server order; `posts` maps
/// each id to its payload.
pub struct PostList {
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default)]
    pub posts: HashMap<String, Post>,
}

impl PostList {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates posts following the server-provided `order`.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &Post> {
        self.order.iter().filter_map(|id| self.posts.get(id))
    }
}
