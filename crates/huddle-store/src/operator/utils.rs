//! Pure helpers shared by the handlers.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use huddle_shared::raw::{
    RawChannel, RawChannelMember, RawMyChannel, RawParticipant, RawPreference, RawReaction,
    RawThreadParticipant,
};

use crate::models::{Preference, Reaction, ThreadParticipant};
use crate::operator::keys::reaction_key;

/// Collapse raws that share a key, keeping the LAST occurrence of each.
///
/// Survivors come out in the order of their winning occurrence, so the
/// result only depends on the input order.
pub fn unique_raws_by<R, K, F>(raws: Vec<R>, key: F) -> Vec<R>
where
    F: Fn(&R) -> K,
    K: Eq + Hash,
{
    let mut last: HashMap<K, usize> = HashMap::with_capacity(raws.len());
    for (idx, raw) in raws.iter().enumerate() {
        last.insert(key(raw), idx);
    }
    if last.len() == raws.len() {
        return raws;
    }

    raws.into_iter()
        .enumerate()
        .filter(|(idx, raw)| last.get(&key(raw)) == Some(idx))
        .map(|(_, raw)| raw)
        .collect()
}

/// Participants to add to and remove from one thread.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParticipantDiff {
    pub create: Vec<RawThreadParticipant>,
    pub delete: Vec<ThreadParticipant>,
}

/// Compare the stored participants of `thread_id` with an incoming list.
///
/// Incoming users not yet stored are created. Unless `skip_sync` is set,
/// stored users missing from the incoming list are deleted; with
/// `skip_sync` the merge is purely additive.
pub fn diff_thread_participants(
    thread_id: &str,
    stored: &[ThreadParticipant],
    incoming: &[RawParticipant],
    skip_sync: bool,
) -> ParticipantDiff {
    let stored_users: HashSet<&str> = stored
        .iter()
        .filter(|p| p.thread_id == thread_id)
        .map(|p| p.user_id.as_str())
        .collect();
    let incoming_users: HashSet<&str> = incoming.iter().map(|p| p.id.as_str()).collect();

    let mut seen = HashSet::new();
    let create = incoming
        .iter()
        .filter(|p| !stored_users.contains(p.id.as_str()) && seen.insert(p.id.as_str()))
        .map(|p| RawThreadParticipant {
            thread_id: thread_id.to_string(),
            user_id: p.id.clone(),
        })
        .collect();

    let delete = if skip_sync {
        Vec::new()
    } else {
        stored
            .iter()
            .filter(|p| p.thread_id == thread_id && !incoming_users.contains(p.user_id.as_str()))
            .cloned()
            .collect()
    };

    ParticipantDiff { create, delete }
}

/// Reactions to add to and remove from one post.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReactionDiff {
    pub create: Vec<RawReaction>,
    pub delete: Vec<Reaction>,
}

/// Compare the stored reactions of a post with its complete incoming list.
///
/// Incoming reactions not yet stored are created and stored reactions that
/// were not resent are deleted. A reaction present on both sides yields
/// nothing.
pub fn diff_reactions(stored: Vec<Reaction>, incoming: Vec<RawReaction>) -> ReactionDiff {
    let incoming_keys: HashSet<String> = incoming
        .iter()
        .map(|r| reaction_key(&r.post_id, &r.user_id, &r.emoji_name))
        .collect();
    let stored_keys: HashSet<String> = stored.iter().map(|r| r.id.clone()).collect();

    let create = incoming
        .into_iter()
        .filter(|r| !stored_keys.contains(&reaction_key(&r.post_id, &r.user_id, &r.emoji_name)))
        .collect();
    let delete = stored
        .into_iter()
        .filter(|r| !incoming_keys.contains(&r.id))
        .collect();

    ReactionDiff { create, delete }
}

/// Stored preferences whose category and name pair does not appear in
/// `incoming`.
pub fn stale_preferences(stored: Vec<Preference>, incoming: &[RawPreference]) -> Vec<Preference> {
    let keep: HashSet<(&str, &str)> = incoming
        .iter()
        .map(|p| (p.category.as_str(), p.name.as_str()))
        .collect();

    stored
        .into_iter()
        .filter(|p| !keep.contains(&(p.category.as_str(), p.name.as_str())))
        .collect()
}

/// Turn a membership into per-user channel state.
///
/// With the channel known, the unread count is the channel total minus
/// what the member has read, floored at zero, and the unread flag follows
/// it. Without the channel the derived fields are left unset, since the
/// member's own counter is a read count, not an unread one.
pub fn derive_my_channel(member: &RawChannelMember, channel: Option<&RawChannel>) -> RawMyChannel {
    let (msg_count, last_post_at) = match channel {
        Some(channel) => (
            Some((channel.total_msg_count - member.msg_count).max(0)),
            Some(channel.last_post_at),
        ),
        None => (None, None),
    };

    RawMyChannel {
        channel_id: member.channel_id.clone(),
        user_id: member.user_id.clone(),
        roles: member.roles.clone(),
        msg_count,
        mention_count: member.mention_count,
        last_viewed_at: member.last_viewed_at,
        last_post_at,
        is_unread: msg_count.map(|count| count > 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: &'static str,
        v: u32,
    }

    fn item(id: &'static str, v: u32) -> Item {
        Item { id, v }
    }

    #[test]
    fn last_occurrence_wins() {
        let raws = vec![item("a", 1), item("b", 1), item("a", 2)];
        let unique = unique_raws_by(raws, |r| r.id);
        assert_eq!(unique, vec![item("b", 1), item("a", 2)]);
    }

    #[test]
    fn distinct_input_is_returned_as_is() {
        let raws = vec![item("a", 1), item("b", 2)];
        assert_eq!(unique_raws_by(raws.clone(), |r| r.id), raws);
        assert!(unique_raws_by(Vec::<Item>::new(), |r| r.id).is_empty());
    }

    #[test]
    fn dedupe_is_deterministic() {
        let raws = vec![item("x", 1), item("y", 1), item("x", 2), item("y", 2), item("x", 3)];
        let first = unique_raws_by(raws.clone(), |r| r.id);
        let second = unique_raws_by(raws, |r| r.id);
        assert_eq!(first, second);
        assert_eq!(first, vec![item("y", 2), item("x", 3)]);
    }

    fn stored(thread_id: &str, user_id: &str) -> ThreadParticipant {
        ThreadParticipant {
            id: format!("{thread_id}-{user_id}"),
            thread_id: thread_id.to_string(),
            user_id: user_id.to_string(),
        }
    }

    fn incoming(ids: &[&str]) -> Vec<RawParticipant> {
        ids.iter().map(|id| RawParticipant { id: id.to_string() }).collect()
    }

    #[test]
    fn participant_sync_replaces_the_set() {
        let current = vec![stored("t1", "u1"), stored("t1", "u2")];
        let diff = diff_thread_participants("t1", &current, &incoming(&["u2", "u3"]), false);

        assert_eq!(diff.create.len(), 1);
        assert_eq!(diff.create[0].user_id, "u3");
        assert_eq!(diff.delete, vec![stored("t1", "u1")]);
    }

    #[test]
    fn participant_skip_sync_only_adds() {
        let current = vec![stored("t1", "u1")];
        let diff = diff_thread_participants("t1", &current, &incoming(&["u2", "u2"]), true);

        assert_eq!(diff.create.len(), 1);
        assert!(diff.delete.is_empty());
    }

    #[test]
    fn empty_incoming_list_clears_participants() {
        let current = vec![stored("t1", "u1"), stored("t1", "u2")];
        let diff = diff_thread_participants("t1", &current, &[], false);
        assert!(diff.create.is_empty());
        assert_eq!(diff.delete.len(), 2);
    }

    #[test]
    fn unread_count_is_floored() {
        let channel = RawChannel {
            id: "c1".to_string(),
            total_msg_count: 50,
            last_post_at: 7,
            ..Default::default()
        };
        let mut member = RawChannelMember {
            channel_id: "c1".to_string(),
            msg_count: 60,
            ..Default::default()
        };

        let ahead = derive_my_channel(&member, Some(&channel));
        assert_eq!(ahead.msg_count, Some(0));
        assert_eq!(ahead.is_unread, Some(false));
        assert_eq!(ahead.last_post_at, Some(7));

        member.msg_count = 42;
        let behind = derive_my_channel(&member, Some(&channel));
        assert_eq!(behind.msg_count, Some(8));
        assert_eq!(behind.is_unread, Some(true));
    }

    fn stored_reaction(user_id: &str, emoji_name: &str) -> Reaction {
        Reaction {
            id: reaction_key("p1", user_id, emoji_name),
            post_id: "p1".to_string(),
            user_id: user_id.to_string(),
            emoji_name: emoji_name.to_string(),
            create_at: 1,
        }
    }

    fn raw_reaction(user_id: &str, emoji_name: &str) -> RawReaction {
        RawReaction {
            post_id: "p1".to_string(),
            user_id: user_id.to_string(),
            emoji_name: emoji_name.to_string(),
            create_at: 2,
        }
    }

    #[test]
    fn reaction_diff_creates_missing_and_drops_absent() {
        let stored = vec![stored_reaction("u1", "smile"), stored_reaction("u2", "tada")];
        let incoming = vec![raw_reaction("u1", "smile"), raw_reaction("u3", "smile")];

        let diff = diff_reactions(stored, incoming);
        assert_eq!(diff.create, vec![raw_reaction("u3", "smile")]);
        assert_eq!(diff.delete, vec![stored_reaction("u2", "tada")]);
    }

    #[test]
    fn empty_reaction_list_clears_the_post() {
        let diff = diff_reactions(vec![stored_reaction("u1", "smile")], Vec::new());
        assert!(diff.create.is_empty());
        assert_eq!(diff.delete.len(), 1);
    }

    #[test]
    fn unknown_channel_leaves_counters_unset() {
        let member = RawChannelMember {
            channel_id: "c1".to_string(),
            msg_count: 42,
            ..Default::default()
        };

        let derived = derive_my_channel(&member, None);
        assert_eq!(derived.msg_count, None);
        assert_eq!(derived.is_unread, None);
        assert_eq!(derived.last_post_at, None);
    }

    #[test]
    fn stale_preferences_are_those_not_resent() {
        let pref = |name: &str| Preference {
            id: format!("display-{name}-u1"),
            category: "display".to_string(),
            name: name.to_string(),
            user_id: "u1".to_string(),
            value: "x".to_string(),
        };
        let raw = RawPreference {
            user_id: "u1".to_string(),
            category: "display".to_string(),
            name: "theme".to_string(),
            value: "dark".to_string(),
        };

        let stale = stale_preferences(vec![pref("theme"), pref("font")], &[raw.clone()]);
        assert_eq!(stale, vec![pref("font")]);

        // matching ignores the owner
        let mut other = pref("theme");
        other.user_id = "u2".to_string();
        assert!(stale_preferences(vec![other], &[raw]).is_empty());
    }
}
