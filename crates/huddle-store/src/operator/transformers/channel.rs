use huddle_shared::raw::{RawChannel, RawChannelInfo, RawChannelMember, RawMyChannel};

use super::{all_present, record_id, Reconcile};
use crate::models::{Channel, ChannelInfo, ChannelMembership, MyChannel, MyChannelSettings};
use crate::operator::comparators::{
    channel_info_matches, channel_matches, channel_membership_matches, my_channel_matches,
    my_channel_settings_matches,
};
use crate::operator::keys::channel_membership_key;

impl Reconcile for Channel {
    type Raw = RawChannel;

    fn local_id(raw: &RawChannel) -> String {
        raw.id.clone()
    }

    fn is_same(&self, raw: &RawChannel) -> bool {
        channel_matches(self, raw)
    }

    fn transform(raw: &RawChannel, existing: Option<&Self>) -> Self {
        Channel {
            id: record_id(existing, || raw.id.clone()),
            create_at: raw.create_at,
            update_at: raw.update_at,
            delete_at: raw.delete_at,
            creator_id: raw.creator_id.clone(),
            display_name: raw.display_name.clone(),
            is_group_constrained: raw.group_constrained.unwrap_or(false),
            name: raw.name.clone(),
            team_id: raw.team_id.clone(),
            channel_type: raw.channel_type.clone(),
        }
    }
}

impl Reconcile for ChannelInfo {
    type Raw = RawChannelInfo;

    fn local_id(raw: &RawChannelInfo) -> String {
        raw.id.clone()
    }

    fn is_same(&self, raw: &RawChannelInfo) -> bool {
        channel_info_matches(self, raw)
    }

    fn transform(raw: &RawChannelInfo, existing: Option<&Self>) -> Self {
        let kept = |count: Option<i64>, stored: fn(&ChannelInfo) -> i64| {
            count.or(existing.map(stored)).unwrap_or(0).max(0)
        };
        ChannelInfo {
            id: record_id(existing, || raw.id.clone()),
            header: raw.header.clone(),
            purpose: raw.purpose.clone(),
            member_count: kept(raw.member_count, |info| info.member_count),
            guest_count: kept(raw.guest_count, |info| info.guest_count),
            pinned_post_count: kept(raw.pinned_post_count, |info| info.pinned_post_count),
        }
    }
}

impl Reconcile for ChannelMembership {
    type Raw = RawChannelMember;

    fn local_id(raw: &RawChannelMember) -> String {
        channel_membership_key(&raw.channel_id, &raw.user_id)
    }

    fn is_identified(raw: &RawChannelMember) -> bool {
        all_present(&[&raw.channel_id, &raw.user_id])
    }

    fn is_same(&self, raw: &RawChannelMember) -> bool {
        channel_membership_matches(self, raw)
    }

    fn transform(raw: &RawChannelMember, existing: Option<&Self>) -> Self {
        ChannelMembership {
            id: record_id(existing, || Self::local_id(raw)),
            channel_id: raw.channel_id.clone(),
            user_id: raw.user_id.clone(),
            roles: raw.roles.clone(),
        }
    }
}

impl Reconcile for MyChannel {
    type Raw = RawMyChannel;

    fn local_id(raw: &RawMyChannel) -> String {
        raw.channel_id.clone()
    }

    fn is_same(&self, raw: &RawMyChannel) -> bool {
        my_channel_matches(self, raw)
    }

    fn transform(raw: &RawMyChannel, existing: Option<&Self>) -> Self {
        MyChannel {
            id: record_id(existing, || raw.channel_id.clone()),
            last_post_at: raw
                .last_post_at
                .or(existing.map(|e| e.last_post_at))
                .unwrap_or(0),
            last_viewed_at: raw.last_viewed_at,
            mentions_count: raw.mention_count,
            message_count: raw
                .msg_count
                .map(|count| count.max(0))
                .or(existing.map(|e| e.message_count))
                .unwrap_or(0),
            is_unread: raw
                .is_unread
                .or(existing.map(|e| e.is_unread))
                .unwrap_or(false),
            roles: raw.roles.clone(),
        }
    }
}

impl Reconcile for MyChannelSettings {
    type Raw = RawChannelMember;

    fn local_id(raw: &RawChannelMember) -> String {
        raw.channel_id.clone()
    }

    fn is_same(&self, raw: &RawChannelMember) -> bool {
        my_channel_settings_matches(self, raw)
    }

    fn transform(raw: &RawChannelMember, existing: Option<&Self>) -> Self {
        MyChannelSettings {
            id: record_id(existing, || raw.channel_id.clone()),
            notify_props: raw.notify_props.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_info_keeps_counters_the_payload_omits() {
        let stored = ChannelInfo {
            id: "c1".to_string(),
            header: "old".to_string(),
            purpose: String::new(),
            member_count: 12,
            guest_count: 2,
            pinned_post_count: 1,
        };
        let raw = RawChannelInfo {
            id: "c1".to_string(),
            header: "new".to_string(),
            member_count: Some(13),
            ..Default::default()
        };

        let info = ChannelInfo::transform(&raw, Some(&stored));
        assert_eq!(info.header, "new");
        assert_eq!(info.member_count, 13);
        assert_eq!(info.guest_count, 2);
        assert_eq!(info.pinned_post_count, 1);

        let fresh = ChannelInfo::transform(&raw, None);
        assert_eq!(fresh.guest_count, 0);
    }

    #[test]
    fn update_keeps_stored_id_and_last_post_when_channel_unknown() {
        let stored = MyChannel {
            id: "c1".to_string(),
            last_post_at: 900,
            last_viewed_at: 100,
            mentions_count: 0,
            message_count: 0,
            is_unread: false,
            roles: String::new(),
        };
        let raw = RawMyChannel {
            channel_id: "c1".to_string(),
            last_viewed_at: 200,
            last_post_at: None,
            ..Default::default()
        };

        let record = MyChannel::transform(&raw, Some(&stored));
        assert_eq!(record.id, "c1");
        assert_eq!(record.last_post_at, 900);
        assert_eq!(record.last_viewed_at, 200);
    }

    #[test]
    fn counters_are_kept_when_channel_unknown() {
        let stored = MyChannel {
            id: "c1".to_string(),
            last_post_at: 900,
            last_viewed_at: 100,
            mentions_count: 0,
            message_count: 3,
            is_unread: true,
            roles: String::new(),
        };
        let raw = RawMyChannel {
            channel_id: "c1".to_string(),
            ..Default::default()
        };

        let updated = MyChannel::transform(&raw, Some(&stored));
        assert_eq!(updated.message_count, 3);
        assert!(updated.is_unread);

        let created = MyChannel::transform(&raw, None);
        assert_eq!(created.message_count, 0);
        assert!(!created.is_unread);
    }

    #[test]
    fn negative_message_count_is_floored() {
        let raw = RawMyChannel {
            channel_id: "c1".to_string(),
            msg_count: Some(-4),
            ..Default::default()
        };
        assert_eq!(MyChannel::transform(&raw, None).message_count, 0);
    }

    #[test]
    fn membership_key_combines_channel_and_user() {
        let raw = RawChannelMember {
            channel_id: "c1".to_string(),
            user_id: "u1".to_string(),
            ..Default::default()
        };
        assert_eq!(ChannelMembership::transform(&raw, None).id, "c1-u1");
    }
}
