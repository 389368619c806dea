//! The data operator: reconciles raw server payloads into the local store
//! of one server.
//!
//! Every handler follows the same pipeline. Raws are deduplicated by local
//! key (last occurrence wins), looked up in one pass, compared with what is
//! stored, and turned into a list of [`PreparedMutation`]s. With
//! [`WriteMode::Commit`] the list is written in a single transaction before
//! it is returned; with [`WriteMode::PrepareOnly`] nothing touches the
//! database and the caller can merge lists from several handlers into one
//! [`DataOperator::batch_records`] call.

pub mod comparators;
mod dispatch;
mod handlers;
pub mod keys;
pub mod transformers;
pub mod utils;

use std::collections::HashMap;

use crate::config::StoreConfig;
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::mutation::PreparedMutation;
use crate::writer::BatchWriter;

pub use transformers::Reconcile;

/// Whether a handler commits what it prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Return the mutations without writing them.
    #[default]
    PrepareOnly,
    /// Write the mutations in one transaction, then return them.
    Commit,
}

impl WriteMode {
    pub fn commits(self) -> bool {
        self == WriteMode::Commit
    }
}

/// Reconciliation entry point for one server's database.
pub struct DataOperator {
    db: Database,
    server_url: String,
}

impl DataOperator {
    pub fn new(db: Database, server_url: impl Into<String>) -> Self {
        Self {
            db,
            server_url: server_url.into(),
        }
    }

    /// Open the database of `server_url` and wrap it.
    pub fn open(config: &StoreConfig, server_url: &str) -> Result<Self> {
        let db = Database::open(config, server_url)?;
        Ok(Self::new(db, server_url))
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.db
    }

    /// Commit prepared mutations, possibly gathered from several handlers,
    /// in one transaction.
    pub fn batch_records(&mut self, mutations: &[PreparedMutation]) -> Result<()> {
        self.db.batch_records(mutations)
    }

    /// Map raws to create or update mutations without writing anything.
    ///
    /// Raws are expected to be deduplicated already. A raw missing any of
    /// its identity fields fails the whole call with
    /// [`StoreError::Validation`]. A raw whose key
    /// matches a stored record that the comparator rejects is prepared as a
    /// create and will fail at commit on the duplicate key.
    pub fn prepare_records<T: Reconcile>(&self, raws: &[T::Raw]) -> Result<Vec<PreparedMutation>> {
        if raws.is_empty() {
            return Ok(Vec::new());
        }
        if !raws.iter().all(T::is_identified) {
            return Err(StoreError::Validation(format!(
                "a {} raw is missing its identity fields",
                T::TABLE
            )));
        }

        let keys: Vec<String> = raws.iter().map(T::local_id).collect();
        let existing: HashMap<String, T> = T::fetch_by_ids(self.db.conn(), &keys)?
            .into_iter()
            .map(|record| (record.id().to_string(), record))
            .collect();

        let mut batch = Vec::with_capacity(raws.len());
        let mut updates = 0usize;
        for (raw, key) in raws.iter().zip(&keys) {
            match existing.get(key) {
                Some(record) if record.is_same(raw) => {
                    updates += 1;
                    batch.push(PreparedMutation::Update(
                        T::transform(raw, Some(record)).into_record(),
                    ));
                }
                Some(_) => {
                    tracing::warn!(table = %T::TABLE, key = %key, "local key collision");
                    batch.push(PreparedMutation::Create(T::transform(raw, None).into_record()));
                }
                None => {
                    batch.push(PreparedMutation::Create(T::transform(raw, None).into_record()));
                }
            }
        }

        tracing::debug!(
            table = %T::TABLE,
            creates = batch.len() - updates,
            updates,
            "records prepared"
        );
        Ok(batch)
    }

    /// Deduplicate, prepare and optionally commit one table's raws.
    pub(crate) fn handle_records<T: Reconcile>(
        &mut self,
        raws: Vec<T::Raw>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        let unique = utils::unique_raws_by(raws, T::local_id);
        let batch = self.prepare_records::<T>(&unique)?;
        self.finish(batch, mode)
    }

    fn finish(
        &mut self,
        batch: Vec<PreparedMutation>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        if mode.commits() {
            self.batch_records(&batch)?;
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use huddle_shared::raw::RawRole;
    use huddle_shared::types::Table;

    use super::*;
    use crate::models::Role;
    use crate::mutation::Action;

    fn operator() -> DataOperator {
        DataOperator::new(Database::open_in_memory().unwrap(), "https://chat.example.com")
    }

    fn raw_role(id: &str, permissions: &[&str]) -> RawRole {
        RawRole {
            id: id.to_string(),
            name: format!("{id}_role"),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn prepare_does_not_write() {
        let op = operator();
        let batch = op.prepare_records::<Role>(&[raw_role("r1", &["a"])]).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].action(), Action::Create);
        assert_eq!(op.database().count(Table::Role).unwrap(), 0);
    }

    #[test]
    fn second_pass_prepares_updates() {
        let mut op = operator();
        op.handle_records::<Role>(vec![raw_role("r1", &["a"])], WriteMode::Commit)
            .unwrap();

        let batch = op
            .handle_records::<Role>(vec![raw_role("r1", &["a", "b"])], WriteMode::Commit)
            .unwrap();
        assert_eq!(batch[0].action(), Action::Update);
        assert_eq!(op.database().get_role("r1").unwrap().permissions, vec!["a", "b"]);
        assert_eq!(op.database().count(Table::Role).unwrap(), 1);
    }
}
