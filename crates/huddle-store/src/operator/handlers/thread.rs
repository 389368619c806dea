use std::collections::HashMap;

use huddle_shared::raw::{ParticipantsPerThread, RawThread, RawThreadInTeam};

use super::warn_if_empty;
use crate::error::Result;
use crate::models::{Thread, ThreadInTeam, ThreadParticipant};
use crate::mutation::{LocalRecord, PreparedMutation};
use crate::operator::utils::{diff_thread_participants, unique_raws_by};
use crate::operator::{DataOperator, Reconcile, WriteMode};
use crate::threads::{participants_of_threads, teams_of_threads};

impl DataOperator {
    /// Reconcile threads.
    ///
    /// Threads with a non-zero `delete_at` are removed together with their
    /// participants and team associations. The others are created or
    /// updated; a thread that carries a participant list (even an empty
    /// one) has its participants replaced by it, while `None` leaves them
    /// alone. With `team_id`, every live thread is associated with that
    /// team.
    ///
    /// Everything lands in one batch, so with [`WriteMode::PrepareOnly`]
    /// nothing is written, removals included.
    pub fn handle_threads(
        &mut self,
        threads: Vec<RawThread>,
        team_id: Option<&str>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        if warn_if_empty(&threads, "threads", "handle_threads") {
            return Ok(Vec::new());
        }

        let unique = unique_raws_by(threads, Thread::local_id);
        let (deleted, live): (Vec<RawThread>, Vec<RawThread>) =
            unique.into_iter().partition(|t| t.delete_at > 0);

        let mut batch = Vec::new();
        if !deleted.is_empty() {
            let ids: Vec<String> = deleted.into_iter().map(|t| t.id).collect();
            batch.extend(self.prepare_thread_removal(&ids)?);
        }

        if !live.is_empty() {
            batch.extend(self.prepare_records::<Thread>(&live)?);

            let participants: Vec<ParticipantsPerThread> = live
                .iter()
                .filter_map(|t| {
                    t.participants.as_ref().map(|list| ParticipantsPerThread {
                        thread_id: t.id.clone(),
                        participants: list.clone(),
                    })
                })
                .collect();
            batch.extend(self.handle_thread_participants(
                participants,
                false,
                WriteMode::PrepareOnly,
            )?);

            if let Some(team_id) = team_id {
                let associations = live
                    .iter()
                    .map(|t| RawThreadInTeam {
                        thread_id: t.id.clone(),
                        team_id: team_id.to_string(),
                        loaded_in_global_threads: false,
                    })
                    .collect();
                batch.extend(self.handle_thread_in_team(associations, WriteMode::PrepareOnly)?);
            }
        }

        self.finish(batch, mode)
    }

    /// Reconcile the participant lists of several threads.
    ///
    /// Without `skip_sync` each list is the thread's complete participant
    /// set. With `skip_sync` (partial payloads such as a single new reply)
    /// participants are only added.
    pub fn handle_thread_participants(
        &mut self,
        per_thread: Vec<ParticipantsPerThread>,
        skip_sync: bool,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        if per_thread.is_empty() {
            return Ok(Vec::new());
        }

        let per_thread = unique_raws_by(per_thread, |entry| entry.thread_id.clone());
        let thread_ids: Vec<String> = per_thread.iter().map(|e| e.thread_id.clone()).collect();

        let mut stored: HashMap<String, Vec<ThreadParticipant>> = HashMap::new();
        for participant in participants_of_threads(self.database().conn(), &thread_ids)? {
            stored
                .entry(participant.thread_id.clone())
                .or_default()
                .push(participant);
        }

        let mut creates = Vec::new();
        let mut batch = Vec::new();
        for entry in &per_thread {
            let current = stored.get(&entry.thread_id).map_or(&[][..], Vec::as_slice);
            let diff =
                diff_thread_participants(&entry.thread_id, current, &entry.participants, skip_sync);
            creates.extend(diff.create);
            batch.extend(diff.delete.iter().map(PreparedMutation::destroy));
        }
        batch.extend(self.prepare_records::<ThreadParticipant>(&creates)?);

        self.finish(batch, mode)
    }

    /// Reconcile (thread, team) associations. An empty list is a no-op.
    pub fn handle_thread_in_team(
        &mut self,
        associations: Vec<RawThreadInTeam>,
        mode: WriteMode,
    ) -> Result<Vec<PreparedMutation>> {
        if warn_if_empty(&associations, "threads in team", "handle_thread_in_team") {
            return Ok(Vec::new());
        }
        self.handle_records::<ThreadInTeam>(associations, mode)
    }

    /// Destroy mutations for the given threads and every row that
    /// references them.
    fn prepare_thread_removal(&self, ids: &[String]) -> Result<Vec<PreparedMutation>> {
        let conn = self.database().conn();
        let threads = Thread::fetch_by_ids(conn, ids)?;
        let participants = participants_of_threads(conn, ids)?;
        let teams = teams_of_threads(conn, ids)?;

        tracing::debug!(
            threads = threads.len(),
            participants = participants.len(),
            teams = teams.len(),
            "removing deleted threads"
        );

        let mut batch = Vec::with_capacity(threads.len() + participants.len() + teams.len());
        batch.extend(participants.iter().map(PreparedMutation::destroy));
        batch.extend(teams.iter().map(PreparedMutation::destroy));
        batch.extend(threads.iter().map(PreparedMutation::destroy));
        Ok(batch)
    }
}
