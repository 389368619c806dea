use std::collections::HashMap;

use huddle_shared::raw::{RawChannel, RawChannelInfo, RawChannelMember, RawMyChannel};

use super::require_non_empty;
use crate::error::Result;
use crate::models::{Channel, ChannelInfo, ChannelMembership, MyChannel, MyChannelSettings};
use crate::mutation::PreparedMutation;
use crate::operator::utils::derive_my_channel;
use crate::operator::{DataOperator, WriteMode};

impl DataOperator {
    pub fn handle_channel(
        &mut self,
        channels: Vec<RawChannel>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        require_non_empty(&channels, "channels", "handle_channel")?;
        self.handle_records::<Channel>(channels, mode)
    }

    /// Reconcile channel headers, purposes and member statistics. Counters a
    /// payload leaves out keep their stored value; build the raws from
    /// channels with `RawChannelInfo::from` when only header and purpose
    /// are known.
    pub fn handle_channel_info(
        &mut self,
        infos: Vec<RawChannelInfo>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        require_non_empty(&infos, "channel infos", "handle_channel_info")?;
        self.handle_records::<ChannelInfo>(infos, mode)
    }

    /// Reconcile (channel, user) membership rows, keyed by
    /// `channel_id-user_id`.
    pub fn handle_channel_membership(
        &mut self,
        memberships: Vec<RawChannelMember>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        require_non_empty(&memberships, "channel memberships", "handle_channel_membership")?;
        self.handle_records::<ChannelMembership>(memberships, mode)
    }

    /// Reconcile the current user's per-channel state.
    ///
    /// Unread counters are derived from the matching entry of `channels`;
    /// see [`derive_my_channel`]. Members whose channel is not in `channels`
    /// keep the stored counters, unread flag and last post time.
    pub fn handle_my_channel(
        &mut self,
        channels: &[RawChannel],
        members: Vec<RawChannelMember>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        require_non_empty(&members, "channel members", "handle_my_channel")?;

        let by_id: HashMap<&str, &RawChannel> =
            channels.iter().map(|c| (c.id.as_str(), c)).collect();
        let raws: Vec<RawMyChannel> = members
            .iter()
            .map(|m| derive_my_channel(m, by_id.get(m.channel_id.as_str()).copied()))
            .collect();

        self.handle_records::<MyChannel>(raws, mode)
    }

    pub fn handle_my_channel_settings(
        &mut self,
        settings: Vec<RawChannelMember>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        require_non_empty(&settings, "channel settings", "handle_my_channel_settings")?;
        self.handle_records::<MyChannelSettings>(settings, mode)
    }
}
