#![allow(dead_code)]

use huddle_shared::raw::{
    RawChannel, RawChannelMember, RawParticipant, RawPreference, RawThread, RawUser,
};
use huddle_store::{DataOperator, Database};

pub const SERVER_URL: &str = "https://chat.example.com";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn operator() -> DataOperator {
    init_tracing();
    DataOperator::new(Database::open_in_memory().expect("in-memory db"), SERVER_URL)
}

pub fn channel(id: &str, display_name: &str) -> RawChannel {
    RawChannel {
        id: id.to_string(),
        team_id: "team1".to_string(),
        channel_type: "O".to_string(),
        display_name: display_name.to_string(),
        name: display_name.to_lowercase(),
        ..Default::default()
    }
}

pub fn channel_with_counts(id: &str, total_msg_count: i64, last_post_at: i64) -> RawChannel {
    RawChannel {
        total_msg_count,
        last_post_at,
        ..channel(id, id)
    }
}

pub fn member(channel_id: &str, user_id: &str, msg_count: i64) -> RawChannelMember {
    RawChannelMember {
        channel_id: channel_id.to_string(),
        user_id: user_id.to_string(),
        roles: "channel_user".to_string(),
        msg_count,
        ..Default::default()
    }
}

pub fn thread(id: &str, participants: Option<&[&str]>) -> RawThread {
    RawThread {
        id: id.to_string(),
        reply_count: 1,
        last_reply_at: 100,
        is_following: true,
        participants: participants.map(|ids| {
            ids.iter()
                .map(|id| RawParticipant { id: id.to_string() })
                .collect()
        }),
        ..Default::default()
    }
}

pub fn deleted_thread(id: &str) -> RawThread {
    RawThread {
        delete_at: 1_700_000_000_000,
        ..thread(id, None)
    }
}

pub fn preference(user_id: &str, category: &str, name: &str, value: &str) -> RawPreference {
    RawPreference {
        user_id: user_id.to_string(),
        category: category.to_string(),
        name: name.to_string(),
        value: value.to_string(),
    }
}

pub fn user(id: &str, username: &str) -> RawUser {
    RawUser {
        id: id.to_string(),
        username: username.to_string(),
        roles: "system_user".to_string(),
        ..Default::default()
    }
}
