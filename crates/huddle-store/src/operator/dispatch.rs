//! Routing of tagged raw batches to the matching handler.

use huddle_shared::raw::{
    ConfigsPayload, MyChannelPayload, RawBatch, RawThreadInTeam, ThreadsInTeamPayload,
    ThreadsPayload,
};
use huddle_shared::types::Table;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::mutation::PreparedMutation;
use crate::operator::{DataOperator, WriteMode};

impl DataOperator {
    /// Decode `batch.payload` for `batch.table` and hand it to the matching
    /// handler.
    ///
    /// An unknown table fails with [`StoreError::UnknownEntityKind`] before
    /// the store is touched; a payload of the wrong shape fails with
    /// [`StoreError::Validation`]. The intent picks the sync behaviour:
    /// `full_sync` tombstones preferences that were not resent and
    /// `received_new` makes participant lists additive.
    pub fn handle_raw(&mut self, batch: RawBatch, mode: WriteMode) -> Result<Vec<PreparedMutation>> {
        let table: Table = batch.table.parse()?;
        let intent = batch.intent;
        tracing::debug!(table = %table, intent = intent.as_str(), "dispatching raw batch");

        match table {
            Table::Channel => self.handle_channel(decode(table, batch.payload)?, mode),
            Table::ChannelInfo => self.handle_channel_info(decode(table, batch.payload)?, mode),
            Table::ChannelMembership => {
                self.handle_channel_membership(decode(table, batch.payload)?, mode)
            }
            Table::Config => {
                let payload: ConfigsPayload = decode(table, batch.payload)?;
                self.handle_configs(payload.configs, &payload.configs_to_delete, mode)
            }
            Table::CustomEmoji => self.handle_custom_emojis(decode(table, batch.payload)?, mode),
            Table::MyChannel => {
                let payload: MyChannelPayload = decode(table, batch.payload)?;
                self.handle_my_channel(&payload.channels, payload.members, mode)
            }
            Table::MyChannelSettings => {
                self.handle_my_channel_settings(decode(table, batch.payload)?, mode)
            }
            Table::Preference => self.handle_preferences(
                decode(table, batch.payload)?,
                intent.is_full_sync(),
                mode,
            ),
            Table::Reaction => self.handle_reactions(decode(table, batch.payload)?, mode),
            Table::Role => self.handle_role(decode(table, batch.payload)?, mode),
            Table::System => self.handle_system(decode(table, batch.payload)?, mode),
            Table::Thread => {
                let payload: ThreadsPayload = decode(table, batch.payload)?;
                self.handle_threads(payload.threads, payload.team_id.as_deref(), mode)
            }
            Table::ThreadParticipant => self.handle_thread_participants(
                decode(table, batch.payload)?,
                intent.is_partial(),
                mode,
            ),
            Table::ThreadsInTeam => {
                let payload: ThreadsInTeamPayload = decode(table, batch.payload)?;
                let associations = payload
                    .thread_ids
                    .into_iter()
                    .map(|thread_id| RawThreadInTeam {
                        thread_id,
                        team_id: payload.team_id.clone(),
                        loaded_in_global_threads: payload.loaded_in_global_threads,
                    })
                    .collect();
                self.handle_thread_in_team(associations, mode)
            }
            Table::User => self.handle_users(decode(table, batch.payload)?, mode),
        }
    }
}

fn decode<T: DeserializeOwned>(table: Table, payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| StoreError::Validation(format!("malformed {table} payload: {e}")))
}

#[cfg(test)]
mod tests {
    use huddle_shared::types::Intent;
    use serde_json::json;

    use super::*;
    use crate::database::Database;

    fn operator() -> DataOperator {
        DataOperator::new(Database::open_in_memory().unwrap(), "https://chat.example.com")
    }

    #[test]
    fn unknown_table_is_rejected() {
        let mut op = operator();
        let err = op
            .handle_raw(
                RawBatch {
                    table: "Post".to_string(),
                    intent: Intent::Updated,
                    payload: json!([]),
                },
                WriteMode::Commit,
            )
            .unwrap_err();
        assert!(err.is_unknown_entity_kind());
    }

    #[test]
    fn malformed_payload_is_a_validation_error() {
        let mut op = operator();
        let err = op
            .handle_raw(
                RawBatch {
                    table: "Channel".to_string(),
                    intent: Intent::Updated,
                    payload: json!({"not": "a list"}),
                },
                WriteMode::Commit,
            )
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn configs_payload_writes_and_deletes() {
        let mut op = operator();
        op.handle_raw(
            RawBatch {
                table: "Config".to_string(),
                intent: Intent::Updated,
                payload: json!({"configs": [
                    {"id": "SiteName", "value": "Huddle"},
                    {"id": "EnableCustomEmoji", "value": "true"},
                ]}),
            },
            WriteMode::Commit,
        )
        .unwrap();

        let batch = op
            .handle_raw(
                RawBatch {
                    table: "Config".to_string(),
                    intent: Intent::Updated,
                    payload: json!({"configs_to_delete": ["EnableCustomEmoji"]}),
                },
                WriteMode::Commit,
            )
            .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(op.database().count(Table::Config).unwrap(), 1);
        assert_eq!(op.database().get_config("SiteName").unwrap().value, "Huddle");
    }

    #[test]
    fn threads_in_team_payload_fans_out() {
        let mut op = operator();
        let batch = op
            .handle_raw(
                RawBatch {
                    table: "ThreadsInTeam".to_string(),
                    intent: Intent::Updated,
                    payload: json!({
                        "team_id": "team1",
                        "thread_ids": ["t1", "t2"],
                        "loaded_in_global_threads": true,
                    }),
                },
                WriteMode::Commit,
            )
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(op.database().count(Table::ThreadsInTeam).unwrap(), 2);
        assert!(op.database().list_thread_teams("t1").unwrap()[0].loaded_in_global_threads);
    }
}
