//! Transactional batch writer.

use crate::database::Database;
use crate::error::Result;
use crate::mutation::PreparedMutation;

/// Commits a list of prepared mutations atomically.
pub trait BatchWriter {
    /// Apply every mutation in `mutations` inside one write transaction.
    ///
    /// Either all of them become visible or, on error, none of them do.
    /// An empty list is a no-op.
    fn batch_records(&mut self, mutations: &[PreparedMutation]) -> Result<()>;
}

impl BatchWriter for Database {
    fn batch_records(&mut self, mutations: &[PreparedMutation]) -> Result<()> {
        if mutations.is_empty() {
            return Ok(());
        }

        let tx = self.conn_mut().transaction()?;
        for mutation in mutations {
            if let Err(e) = mutation.apply(&tx) {
                tracing::error!(
                    table = %mutation.table(),
                    id = %mutation.id(),
                    action = ?mutation.action(),
                    error = %e,
                    "batch write failed, rolling back"
                );
                // dropping `tx` rolls the whole batch back
                return Err(e.into());
            }
        }
        tx.commit()?;

        tracing::debug!(count = mutations.len(), "batch committed");
        Ok(())
    }
}
