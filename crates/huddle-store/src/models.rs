//! Local records persisted in the per-server SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the UI layer. Field names follow the column names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// A channel, keyed by its server id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub create_at: i64,
    pub update_at: i64,
    /// Non-zero once the channel is archived.
    pub delete_at: i64,
    pub creator_id: String,
    pub display_name: String,
    pub is_group_constrained: bool,
    pub name: String,
    pub team_id: String,
    /// `O` open, `P` private, `D` direct, `G` group.
    pub channel_type: String,
}

/// Header, purpose and member statistics of a channel. Keyed by the
/// channel id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    pub header: String,
    pub purpose: String,
    pub member_count: i64,
    pub guest_count: i64,
    pub pinned_post_count: i64,
}

/// A (channel, user) membership pair. Keyed by `channel_id-user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelMembership {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub roles: String,
}

/// The current user's state in one channel. Keyed by the channel id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MyChannel {
    pub id: String,
    pub last_post_at: i64,
    pub last_viewed_at: i64,
    pub mentions_count: i64,
    /// Unread message count, never negative.
    pub message_count: i64,
    pub is_unread: bool,
    pub roles: String,
}

/// Per-device notification settings for one channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MyChannelSettings {
    pub id: String,
    pub notify_props: Value,
}

// ---------------------------------------------------------------------------
// Threads
// ---------------------------------------------------------------------------

/// A thread, keyed by the id of its root post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thread {
    pub id: String,
    pub is_following: bool,
    pub last_reply_at: i64,
    pub last_viewed_at: i64,
    pub reply_count: i64,
    pub unread_mentions: i64,
    pub unread_replies: i64,
    /// Set locally when the thread screen is opened; never sent by the server.
    pub viewed_at: i64,
}

/// A user taking part in a thread. Keyed by `thread_id-user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadParticipant {
    pub id: String,
    pub thread_id: String,
    pub user_id: String,
}

/// Association of a thread with a team. Keyed by `thread_id-team_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadInTeam {
    pub id: String,
    pub thread_id: String,
    pub team_id: String,
    pub loaded_in_global_threads: bool,
}

// ---------------------------------------------------------------------------
// Users & preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub auth_service: String,
    pub update_at: i64,
    pub delete_at: i64,
    pub email: String,
    pub first_name: String,
    pub is_bot: bool,
    pub is_guest: bool,
    pub last_name: String,
    pub last_picture_update: i64,
    pub locale: String,
    pub nickname: String,
    pub position: String,
    pub roles: String,
    /// Presence. Only overwritten when a payload carries it.
    pub status: String,
    pub username: String,
    pub notify_props: Value,
    pub props: Value,
    pub timezone: Value,
    pub remote_id: String,
}

/// A user preference. Keyed by `category-name-user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preference {
    pub id: String,
    pub category: String,
    pub name: String,
    pub user_id: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Reactions & custom emojis
// ---------------------------------------------------------------------------

/// One user's emoji reaction on a post. Keyed by `post_id-user_id-emoji_name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reaction {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub emoji_name: String,
    pub create_at: i64,
}

/// A server custom emoji. Names are unique per server, so the name is the
/// local key and the server id is kept alongside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomEmoji {
    pub name: String,
    pub emoji_id: String,
    pub creator_id: String,
}

// ---------------------------------------------------------------------------
// Roles & system values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub permissions: Vec<String>,
}

/// A key-value entry (current user id, config, license, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct System {
    pub id: String,
    pub value: Value,
}

/// One server configuration entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub id: String,
    pub value: String,
}
