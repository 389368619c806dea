//! Raw payloads as they come off the wire.
//!
//! These structs mirror the server's JSON field names and are deliberately
//! permissive: every field has a default so a partial payload still decodes.
//! Nothing here is validated against local invariants; that is the store's
//! job.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Intent;

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawChannel {
    pub id: String,
    pub create_at: i64,
    pub update_at: i64,
    pub delete_at: i64,
    pub team_id: String,
    #[serde(rename = "type")]
    pub channel_type: String,
    pub display_name: String,
    pub name: String,
    pub header: String,
    pub purpose: String,
    pub creator_id: String,
    pub last_post_at: i64,
    pub total_msg_count: i64,
    pub group_constrained: Option<bool>,
}

/// Header, purpose and counters of one channel. `id` is the channel id.
///
/// The counters come from the stats endpoint; a `None` keeps what is
/// stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawChannelInfo {
    pub id: String,
    pub header: String,
    pub purpose: String,
    pub member_count: Option<i64>,
    pub guest_count: Option<i64>,
    pub pinned_post_count: Option<i64>,
}

impl From<&RawChannel> for RawChannelInfo {
    fn from(channel: &RawChannel) -> Self {
        RawChannelInfo {
            id: channel.id.clone(),
            header: channel.header.clone(),
            purpose: channel.purpose.clone(),
            ..Default::default()
        }
    }
}

/// A user's membership in a channel. The same payload feeds the
/// `ChannelMembership`, `MyChannel` and `MyChannelSettings` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawChannelMember {
    pub channel_id: String,
    pub user_id: String,
    pub roles: String,
    pub msg_count: i64,
    pub mention_count: i64,
    pub last_viewed_at: i64,
    pub last_update_at: i64,
    pub notify_props: Value,
}

/// Per-user channel state after the unread counters have been derived.
///
/// Built by the store from a [`RawChannelMember`] and, when known, the
/// matching [`RawChannel`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMyChannel {
    pub channel_id: String,
    pub user_id: String,
    pub roles: String,
    /// Unread count. This and the other `Option` fields are `None` when the
    /// channel itself was not part of the payload.
    pub msg_count: Option<i64>,
    pub mention_count: i64,
    pub last_viewed_at: i64,
    pub last_post_at: Option<i64>,
    pub is_unread: Option<bool>,
}

// ---------------------------------------------------------------------------
// Threads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawThread {
    /// Id of the thread's root post.
    pub id: String,
    pub reply_count: i64,
    pub last_reply_at: i64,
    pub last_viewed_at: i64,
    pub is_following: bool,
    pub unread_replies: i64,
    pub unread_mentions: i64,
    pub delete_at: i64,
    /// `None` when the field was absent or `null` (no information),
    /// `Some(vec![])` when the server sent an explicit empty list.
    pub participants: Option<Vec<RawParticipant>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParticipant {
    /// The participating user's id.
    pub id: String,
}

/// One (thread, user) participation, flattened for reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawThreadParticipant {
    pub thread_id: String,
    pub user_id: String,
}

/// One (thread, team) association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawThreadInTeam {
    pub thread_id: String,
    pub team_id: String,
    pub loaded_in_global_threads: bool,
}

/// A thread id paired with its full (or partial) participant list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantsPerThread {
    pub thread_id: String,
    pub participants: Vec<RawParticipant>,
}

// ---------------------------------------------------------------------------
// Users & preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPreference {
    pub user_id: String,
    pub category: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawUser {
    pub id: String,
    pub create_at: i64,
    pub update_at: i64,
    pub delete_at: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub position: Option<String>,
    pub locale: String,
    /// Space separated role names.
    pub roles: String,
    pub is_bot: bool,
    pub auth_service: String,
    pub last_picture_update: i64,
    pub notify_props: Value,
    pub props: Value,
    pub timezone: Value,
    /// Only present when the payload came from the status endpoint.
    pub status: Option<String>,
    pub remote_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Reactions & custom emojis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawReaction {
    pub post_id: String,
    pub user_id: String,
    pub emoji_name: String,
    pub create_at: i64,
}

/// The complete reaction list of one post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionsPerPost {
    pub post_id: String,
    pub reactions: Vec<RawReaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCustomEmoji {
    /// Server id. Emojis are keyed locally by `name`.
    pub id: String,
    pub name: String,
    pub creator_id: String,
}

// ---------------------------------------------------------------------------
// Roles & system values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRole {
    pub id: String,
    pub name: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSystem {
    pub id: String,
    pub value: Value,
}

/// One server configuration entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub id: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// A batch tagged with its target table, as handed over by the network
/// layer. `payload` is decoded by the store once the table is known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBatch {
    pub table: String,
    pub intent: Intent,
    pub payload: Value,
}

/// Payload shape for the `MyChannel` table, which needs the channels to
/// derive its counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MyChannelPayload {
    pub channels: Vec<RawChannel>,
    pub members: Vec<RawChannelMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadsPayload {
    pub threads: Vec<RawThread>,
    pub team_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadsInTeamPayload {
    pub team_id: String,
    pub thread_ids: Vec<String>,
    pub loaded_in_global_threads: bool,
}

/// Config entries to write and config ids to drop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigsPayload {
    pub configs: Vec<RawConfig>,
    pub configs_to_delete: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_null_participants_decode_to_none() {
        let absent: RawThread = serde_json::from_str(r#"{"id":"t1"}"#).unwrap();
        let null: RawThread = serde_json::from_str(r#"{"id":"t1","participants":null}"#).unwrap();
        let empty: RawThread = serde_json::from_str(r#"{"id":"t1","participants":[]}"#).unwrap();

        assert_eq!(absent.participants, None);
        assert_eq!(null.participants, None);
        assert_eq!(empty.participants, Some(vec![]));
    }

    #[test]
    fn channel_type_uses_wire_name() {
        let channel: RawChannel =
            serde_json::from_str(r#"{"id":"c1","type":"O","total_msg_count":3}"#).unwrap();
        assert_eq!(channel.channel_type, "O");
        assert_eq!(channel.total_msg_count, 3);
        assert_eq!(channel.delete_at, 0);
    }

    #[test]
    fn channel_info_from_channel_leaves_counters_unset() {
        let channel: RawChannel = serde_json::from_str(
            r#"{"id":"c1","header":"Daily standup","purpose":"Team chatter"}"#,
        )
        .unwrap();
        let info = RawChannelInfo::from(&channel);
        assert_eq!(info.id, "c1");
        assert_eq!(info.header, "Daily standup");
        assert_eq!(info.purpose, "Team chatter");
        assert_eq!(info.member_count, None);
    }

    #[test]
    fn batch_intent_defaults_to_updated() {
        let batch: RawBatch = serde_json::from_str(r#"{"table":"Role","payload":[]}"#).unwrap();
        assert_eq!(batch.intent, Intent::Updated);
    }
}
