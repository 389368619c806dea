use huddle_shared::raw::{RawPreference, RawUser};

use super::require_non_empty;
use crate::error::Result;
use crate::models::{Preference, User};
use crate::mutation::PreparedMutation;
use crate::operator::utils::{stale_preferences, unique_raws_by};
use crate::operator::{DataOperator, Reconcile, WriteMode};
use crate::users::all_preferences;

impl DataOperator {
    pub fn handle_users(
        &mut self,
        users: Vec<RawUser>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        require_non_empty(&users, "users", "handle_users")?;
        self.handle_records::<User>(users, mode)
    }

    /// Reconcile preferences.
    ///
    /// With `sync`, the incoming list is the complete preference set of the
    /// server: every stored preference whose category and name pair is not
    /// in it is destroyed in the same batch.
    pub fn handle_preferences(
        &mut self,
        preferences: Vec<RawPreference>,
        sync: bool,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        require_non_empty(&preferences, "preferences", "handle_preferences")?;

        let unique = unique_raws_by(preferences, Preference::local_id);
        let mut batch = Vec::new();

        if sync {
            let stored = all_preferences(self.database().conn())?;
            let stale = stale_preferences(stored, &unique);
            if !stale.is_empty() {
                tracing::debug!(count = stale.len(), "dropping stale preferences");
            }
            batch.extend(stale.iter().map(PreparedMutation::destroy));
        }

        batch.extend(self.prepare_records::<Preference>(&unique)?);
        self.finish(batch, mode)
    }
}
