use std::collections::HashMap;

use huddle_shared::raw::{RawReaction, ReactionsPerPost};

use super::require_non_empty;
use crate::error::{Result, StoreError};
use crate::models::Reaction;
use crate::mutation::PreparedMutation;
use crate::operator::utils::{diff_reactions, unique_raws_by};
use crate::operator::{DataOperator, Reconcile, WriteMode};
use crate::reactions::reactions_of_posts;

impl DataOperator {
    /// Reconcile the reactions of a set of posts.
    ///
    /// Each entry is the complete reaction list of its post: reactions not
    /// yet stored are created, stored ones missing from the list are
    /// destroyed, and unchanged ones produce no mutation. The entry's
    /// `post_id` overrides whatever the individual reactions carry.
    pub fn handle_reactions(
        &mut self,
        posts: Vec<ReactionsPerPost>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        require_non_empty(&posts, "reactions", "handle_reactions")?;
        if posts.iter().any(|post| post.post_id.trim().is_empty()) {
            return Err(StoreError::Validation(
                "a reactions entry is missing its post_id".to_string(),
            ));
        }

        let posts = unique_raws_by(posts, |post| post.post_id.clone());
        let post_ids: Vec<String> = posts.iter().map(|post| post.post_id.clone()).collect();
        let mut stored: HashMap<String, Vec<Reaction>> = HashMap::new();
        for reaction in reactions_of_posts(self.database().conn(), &post_ids)? {
            stored.entry(reaction.post_id.clone()).or_default().push(reaction);
        }

        let mut batch = Vec::new();
        for post in posts {
            let incoming: Vec<RawReaction> = post
                .reactions
                .into_iter()
                .map(|reaction| RawReaction {
                    post_id: post.post_id.clone(),
                    ..reaction
                })
                .collect();
            let incoming = unique_raws_by(incoming, Reaction::local_id);

            let diff = diff_reactions(stored.remove(&post.post_id).unwrap_or_default(), incoming);
            tracing::debug!(
                post_id = %post.post_id,
                create = diff.create.len(),
                delete = diff.delete.len(),
                "reactions diffed"
            );
            batch.extend(diff.delete.iter().map(PreparedMutation::destroy));
            batch.extend(self.prepare_records::<Reaction>(&diff.create)?);
        }

        self.finish(batch, mode)
    }
}
