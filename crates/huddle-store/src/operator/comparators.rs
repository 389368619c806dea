//! Identity comparators: does a stored record stand for the same entity as
//! an incoming raw?
//!
//! A record is only ever compared with the raw whose local key matched it,
//! so a `false` here means two distinct entities collided on one key.

use huddle_shared::raw::{
    RawChannel, RawChannelInfo, RawChannelMember, RawConfig, RawCustomEmoji, RawMyChannel,
    RawPreference, RawReaction, RawRole, RawSystem, RawThread, RawThreadInTeam,
    RawThreadParticipant, RawUser,
};

use crate::models::{
    Channel, ChannelInfo, ChannelMembership, Config, CustomEmoji, MyChannel, MyChannelSettings,
    Preference, Reaction, Role, System, Thread, ThreadInTeam, ThreadParticipant, User,
};

pub fn channel_matches(record: &Channel, raw: &RawChannel) -> bool {
    record.id == raw.id
}

pub fn channel_info_matches(record: &ChannelInfo, raw: &RawChannelInfo) -> bool {
    record.id == raw.id
}

pub fn channel_membership_matches(record: &ChannelMembership, raw: &RawChannelMember) -> bool {
    record.channel_id == raw.channel_id && record.user_id == raw.user_id
}

pub fn my_channel_matches(record: &MyChannel, raw: &RawMyChannel) -> bool {
    record.id == raw.channel_id
}

pub fn my_channel_settings_matches(record: &MyChannelSettings, raw: &RawChannelMember) -> bool {
    record.id == raw.channel_id
}

pub fn preference_matches(record: &Preference, raw: &RawPreference) -> bool {
    record.category == raw.category && record.name == raw.name && record.user_id == raw.user_id
}

pub fn reaction_matches(record: &Reaction, raw: &RawReaction) -> bool {
    record.post_id == raw.post_id
        && record.user_id == raw.user_id
        && record.emoji_name == raw.emoji_name
}

pub fn custom_emoji_matches(record: &CustomEmoji, raw: &RawCustomEmoji) -> bool {
    record.name == raw.name
}

pub fn config_matches(record: &Config, raw: &RawConfig) -> bool {
    record.id == raw.id
}

pub fn role_matches(record: &Role, raw: &RawRole) -> bool {
    record.id == raw.id
}

pub fn system_matches(record: &System, raw: &RawSystem) -> bool {
    record.id == raw.id
}

pub fn thread_matches(record: &Thread, raw: &RawThread) -> bool {
    record.id == raw.id
}

pub fn thread_participant_matches(record: &ThreadParticipant, raw: &RawThreadParticipant) -> bool {
    record.thread_id == raw.thread_id && record.user_id == raw.user_id
}

pub fn thread_in_team_matches(record: &ThreadInTeam, raw: &RawThreadInTeam) -> bool {
    record.thread_id == raw.thread_id && record.team_id == raw.team_id
}

pub fn user_matches(record: &User, raw: &RawUser) -> bool {
    record.id == raw.id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_compares_both_halves() {
        let record = ChannelMembership {
            id: "c1-u1".to_string(),
            channel_id: "c1".to_string(),
            user_id: "u1".to_string(),
            roles: String::new(),
        };
        let mut raw = RawChannelMember {
            channel_id: "c1".to_string(),
            user_id: "u1".to_string(),
            ..Default::default()
        };
        assert!(channel_membership_matches(&record, &raw));

        raw.user_id = "u2".to_string();
        assert!(!channel_membership_matches(&record, &raw));
    }

    #[test]
    fn reaction_compares_every_identity_field() {
        let record = Reaction {
            id: "p1-u1-smile".to_string(),
            post_id: "p1".to_string(),
            user_id: "u1".to_string(),
            emoji_name: "smile".to_string(),
            create_at: 1,
        };
        let mut raw = RawReaction {
            post_id: "p1".to_string(),
            user_id: "u1".to_string(),
            emoji_name: "smile".to_string(),
            create_at: 99,
        };
        assert!(reaction_matches(&record, &raw));

        raw.emoji_name = "frown".to_string();
        assert!(!reaction_matches(&record, &raw));
    }

    #[test]
    fn preference_ignores_value() {
        let record = Preference {
            id: "display-theme-u1".to_string(),
            category: "display".to_string(),
            name: "theme".to_string(),
            user_id: "u1".to_string(),
            value: "dark".to_string(),
        };
        let raw = RawPreference {
            category: "display".to_string(),
            name: "theme".to_string(),
            user_id: "u1".to_string(),
            value: "light".to_string(),
        };
        assert!(preference_matches(&record, &raw));
    }
}
