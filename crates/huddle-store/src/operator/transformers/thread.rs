use huddle_shared::raw::{RawThread, RawThreadInTeam, RawThreadParticipant};

use super::{all_present, record_id, Reconcile};
use crate::models::{Thread, ThreadInTeam, ThreadParticipant};
use crate::operator::comparators::{
    thread_in_team_matches, thread_matches, thread_participant_matches,
};
use crate::operator::keys::{thread_in_team_key, thread_participant_key};

impl Reconcile for Thread {
    type Raw = RawThread;

    fn local_id(raw: &RawThread) -> String {
        raw.id.clone()
    }

    fn is_same(&self, raw: &RawThread) -> bool {
        thread_matches(self, raw)
    }

    fn transform(raw: &RawThread, existing: Option<&Self>) -> Self {
        Thread {
            id: record_id(existing, || raw.id.clone()),
            is_following: raw.is_following,
            last_reply_at: raw.last_reply_at,
            last_viewed_at: raw.last_viewed_at,
            reply_count: raw.reply_count,
            unread_mentions: raw.unread_mentions,
            unread_replies: raw.unread_replies,
            viewed_at: existing.map_or(0, |e| e.viewed_at),
        }
    }
}

impl Reconcile for ThreadParticipant {
    type Raw = RawThreadParticipant;

    fn local_id(raw: &RawThreadParticipant) -> String {
        thread_participant_key(&raw.thread_id, &raw.user_id)
    }

    fn is_identified(raw: &RawThreadParticipant) -> bool {
        all_present(&[&raw.thread_id, &raw.user_id])
    }

    fn is_same(&self, raw: &RawThreadParticipant) -> bool {
        thread_participant_matches(self, raw)
    }

    fn transform(raw: &RawThreadParticipant, existing: Option<&Self>) -> Self {
        ThreadParticipant {
            id: record_id(existing, || Self::local_id(raw)),
            thread_id: raw.thread_id.clone(),
            user_id: raw.user_id.clone(),
        }
    }
}

impl Reconcile for ThreadInTeam {
    type Raw = RawThreadInTeam;

    fn local_id(raw: &RawThreadInTeam) -> String {
        thread_in_team_key(&raw.thread_id, &raw.team_id)
    }

    fn is_identified(raw: &RawThreadInTeam) -> bool {
        all_present(&[&raw.thread_id, &raw.team_id])
    }

    fn is_same(&self, raw: &RawThreadInTeam) -> bool {
        thread_in_team_matches(self, raw)
    }

    fn transform(raw: &RawThreadInTeam, existing: Option<&Self>) -> Self {
        ThreadInTeam {
            id: record_id(existing, || Self::local_id(raw)),
            thread_id: raw.thread_id.clone(),
            team_id: raw.team_id.clone(),
            // once loaded in the global list, a thread stays flagged
            loaded_in_global_threads: raw.loaded_in_global_threads
                || existing.is_some_and(|e| e.loaded_in_global_threads),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewed_at_survives_update() {
        let stored = Thread {
            id: "t1".to_string(),
            is_following: true,
            last_reply_at: 1,
            last_viewed_at: 1,
            reply_count: 1,
            unread_mentions: 0,
            unread_replies: 0,
            viewed_at: 42,
        };
        let raw = RawThread {
            id: "t1".to_string(),
            reply_count: 3,
            ..Default::default()
        };

        let record = Thread::transform(&raw, Some(&stored));
        assert_eq!(record.viewed_at, 42);
        assert_eq!(record.reply_count, 3);
        assert_eq!(Thread::transform(&raw, None).viewed_at, 0);
    }

    #[test]
    fn global_threads_flag_is_sticky() {
        let stored = ThreadInTeam {
            id: "t1-team".to_string(),
            thread_id: "t1".to_string(),
            team_id: "team".to_string(),
            loaded_in_global_threads: true,
        };
        let raw = RawThreadInTeam {
            thread_id: "t1".to_string(),
            team_id: "team".to_string(),
            loaded_in_global_threads: false,
        };
        assert!(ThreadInTeam::transform(&raw, Some(&stored)).loaded_in_global_threads);
    }
}
