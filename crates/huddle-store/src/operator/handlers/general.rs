use std::collections::BTreeSet;

use huddle_shared::raw::{RawConfig, RawCustomEmoji, RawRole, RawSystem};

use super::warn_if_empty;
use crate::error::Result;
use crate::models::{Config, CustomEmoji, Role, System};
use crate::mutation::{LocalRecord, PreparedMutation};
use crate::operator::utils::unique_raws_by;
use crate::operator::{DataOperator, Reconcile, WriteMode};

impl DataOperator {
    /// Reconcile roles. An empty list is a no-op.
    pub fn handle_role(
        &mut self,
        roles: Vec<RawRole>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        if warn_if_empty(&roles, "roles", "handle_role") {
            return Ok(Vec::new());
        }
        self.handle_records::<Role>(roles, mode)
    }

    /// Reconcile system key-value entries. An empty list is a no-op.
    pub fn handle_system(
        &mut self,
        systems: Vec<RawSystem>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        if warn_if_empty(&systems, "systems", "handle_system") {
            return Ok(Vec::new());
        }
        self.handle_records::<System>(systems, mode)
    }

    /// Reconcile custom emojis, keyed by name. An empty list is a no-op.
    pub fn handle_custom_emojis(
        &mut self,
        emojis: Vec<RawCustomEmoji>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        if warn_if_empty(&emojis, "emojis", "handle_custom_emojis") {
            return Ok(Vec::new());
        }
        self.handle_records::<CustomEmoji>(emojis, mode)
    }

    /// Write `configs` and destroy the stored entries named in
    /// `configs_to_delete`. An id present in both lists is written, not
    /// destroyed. Two empty lists are a no-op.
    pub fn handle_configs(
        &mut self,
        configs: Vec<RawConfig>,
        configs_to_delete: &[String],
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        if configs.is_empty() && configs_to_delete.is_empty() {
            tracing::warn!(
                handler = "handle_configs",
                "empty \"configs\" and \"configs_to_delete\" arrays have been passed"
            );
            return Ok(Vec::new());
        }

        let unique = unique_raws_by(configs, Config::local_id);
        let doomed: Vec<String> = configs_to_delete
            .iter()
            .filter(|id| !unique.iter().any(|config| &config.id == *id))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut batch: Vec<PreparedMutation> = Config::fetch_by_ids(self.database().conn(), &doomed)?
            .iter()
            .map(PreparedMutation::destroy)
            .collect();
        batch.extend(self.prepare_records::<Config>(&unique)?);
        self.finish(batch, mode)
    }
}
