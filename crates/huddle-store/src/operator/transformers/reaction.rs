use huddle_shared::raw::RawReaction;

use super::{all_present, record_id, Reconcile};
use crate::models::Reaction;
use crate::operator::comparators::reaction_matches;
use crate::operator::keys::reaction_key;

impl Reconcile for Reaction {
    type Raw = RawReaction;

    fn local_id(raw: &RawReaction) -> String {
        reaction_key(&raw.post_id, &raw.user_id, &raw.emoji_name)
    }

    fn is_identified(raw: &RawReaction) -> bool {
        all_present(&[&raw.post_id, &raw.user_id, &raw.emoji_name])
    }

    fn is_same(&self, raw: &RawReaction) -> bool {
        reaction_matches(self, raw)
    }

    fn transform(raw: &RawReaction, existing: Option<&Self>) -> Self {
        Reaction {
            id: record_id(existing, || Self::local_id(raw)),
            post_id: raw.post_id.clone(),
            user_id: raw.user_id.clone(),
            emoji_name: raw.emoji_name.clone(),
            create_at: raw.create_at,
        }
    }
}
