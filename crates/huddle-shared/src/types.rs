use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HuddleError;

/// Every table the local store knows how to reconcile.
///
/// The string form is the SQLite table name and the name the network layer
/// uses when it tags a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    Channel,
    ChannelInfo,
    ChannelMembership,
    Config,
    CustomEmoji,
    MyChannel,
    MyChannelSettings,
    Preference,
    Reaction,
    Role,
    System,
    Thread,
    ThreadParticipant,
    ThreadsInTeam,
    User,
}

impl Table {
    pub const ALL: [Table; 15] = [
        Table::Channel,
        Table::ChannelInfo,
        Table::ChannelMembership,
        Table::Config,
        Table::CustomEmoji,
        Table::MyChannel,
        Table::MyChannelSettings,
        Table::Preference,
        Table::Reaction,
        Table::Role,
        Table::System,
        Table::Thread,
        Table::ThreadParticipant,
        Table::ThreadsInTeam,
        Table::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Channel => "Channel",
            Table::ChannelInfo => "ChannelInfo",
            Table::ChannelMembership => "ChannelMembership",
            Table::Config => "Config",
            Table::CustomEmoji => "CustomEmoji",
            Table::MyChannel => "MyChannel",
            Table::MyChannelSettings => "MyChannelSettings",
            Table::Preference => "Preference",
            Table::Reaction => "Reaction",
            Table::Role => "Role",
            Table::System => "System",
            Table::Thread => "Thread",
            Table::ThreadParticipant => "ThreadParticipant",
            Table::ThreadsInTeam => "ThreadsInTeam",
            Table::User => "User",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = HuddleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| HuddleError::UnknownTable(s.to_string()))
    }
}

/// Why a batch of raws arrived. Handlers use it to pick cascade and
/// tombstone behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// A push or socket event carrying something new. Partial by nature,
    /// so relationship lists are merged rather than replaced.
    ReceivedNew,
    /// A REST page fetched for one channel.
    ReceivedInChannel,
    /// A REST page fetched for one thread.
    ReceivedInThread,
    /// A complete snapshot; anything stored but absent is stale.
    FullSync,
    /// A plain update of already known entities.
    #[default]
    Updated,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ReceivedNew => "received_new",
            Intent::ReceivedInChannel => "received_in_channel",
            Intent::ReceivedInThread => "received_in_thread",
            Intent::FullSync => "full_sync",
            Intent::Updated => "updated",
        }
    }

    pub fn is_full_sync(&self) -> bool {
        matches!(self, Intent::FullSync)
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Intent::ReceivedNew)
    }
}
