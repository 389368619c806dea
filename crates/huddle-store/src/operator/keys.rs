//! Local primary keys.
//!
//! Relationship rows have no server-issued id, so their key is synthesized
//! from the identity fields. [`build_key`] is injective: distinct part
//! tuples never produce the same key, even when a part contains the
//! separator.

use huddle_shared::constants::{KEY_ESCAPE, KEY_SEPARATOR};

/// Join `parts` with `-`, escaping `\` and `-` inside each part.
///
/// Plain alphanumeric ids come out unchanged, e.g. `["c1", "u1"]` gives
/// `c1-u1`.
pub fn build_key(parts: &[&str]) -> String {
    let mut key = String::with_capacity(parts.iter().map(|p| p.len() + 1).sum());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        for c in part.chars() {
            if c == KEY_SEPARATOR || c == KEY_ESCAPE {
                key.push(KEY_ESCAPE);
            }
            key.push(c);
        }
    }
    key
}

pub fn channel_membership_key(channel_id: &str, user_id: &str) -> String {
    build_key(&[channel_id, user_id])
}

pub fn thread_participant_key(thread_id: &str, user_id: &str) -> String {
    build_key(&[thread_id, user_id])
}

pub fn thread_in_team_key(thread_id: &str, team_id: &str) -> String {
    build_key(&[thread_id, team_id])
}

pub fn reaction_key(post_id: &str, user_id: &str, emoji_name: &str) -> String {
    build_key(&[post_id, user_id, emoji_name])
}

pub fn preference_key(category: &str, name: &str, user_id: &str) -> String {
    build_key(&[category, name, user_id])
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn plain_ids_join_with_dash() {
        assert_eq!(channel_membership_key("c1", "u1"), "c1-u1");
        assert_eq!(preference_key("display", "theme", "u1"), "display-theme-u1");
        assert_eq!(reaction_key("p1", "u1", "smile"), "p1-u1-smile");
    }

    #[test]
    fn keys_are_stable() {
        assert_eq!(build_key(&["a", "b"]), build_key(&["a", "b"]));
    }

    #[test]
    fn separator_inside_a_part_does_not_collide() {
        // naive joining would give "a-b-c" for both
        assert_ne!(build_key(&["a-b", "c"]), build_key(&["a", "b-c"]));
        assert_ne!(build_key(&["a\\", "b"]), build_key(&["a", "\\b"]));
        assert_ne!(build_key(&["a\\-", "b"]), build_key(&["a", "-b"]));
    }

    #[test]
    fn injective_over_tricky_inputs() {
        let alphabet = ["", "a", "-", "\\", "a-", "-a", "\\-", "-\\", "a\\b", "--"];
        let mut seen: HashMap<String, (String, String, String)> = HashMap::new();
        for x in alphabet {
            for y in alphabet {
                for z in alphabet {
                    let key = preference_key(x, y, z);
                    let tuple = (x.to_string(), y.to_string(), z.to_string());
                    if let Some(prev) = seen.insert(key.clone(), tuple.clone()) {
                        panic!("{key:?} produced by both {prev:?} and {tuple:?}");
                    }
                }
            }
        }
    }
}
