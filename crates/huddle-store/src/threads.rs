//! Storage for [`Thread`], [`ThreadParticipant`] and [`ThreadInTeam`]
//! records.

use huddle_shared::types::Table;
use rusqlite::{params, Connection};

use crate::channels::get_one;
use crate::database::{fetch_where_in, Database};
use crate::error::{Result, StoreError};
use crate::models::{Thread, ThreadInTeam, ThreadParticipant};
use crate::mutation::{expect_one, LocalRecord, Record};

const THREAD_SELECT: &str = "SELECT id, is_following, last_reply_at, last_viewed_at, reply_count,
        unread_mentions, unread_replies, viewed_at
 FROM Thread";

const PARTICIPANT_SELECT: &str = "SELECT id, thread_id, user_id FROM ThreadParticipant";

const THREAD_IN_TEAM_SELECT: &str =
    "SELECT id, thread_id, team_id, loaded_in_global_threads FROM ThreadsInTeam";

impl LocalRecord for Thread {
    const TABLE: Table = Table::Thread;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, THREAD_SELECT, "id", ids, row_to_thread)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO Thread (id, is_following, last_reply_at, last_viewed_at, reply_count,
                                 unread_mentions, unread_replies, viewed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                self.id,
                self.is_following,
                self.last_reply_at,
                self.last_viewed_at,
                self.reply_count,
                self.unread_mentions,
                self.unread_replies,
                self.viewed_at,
            ],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE Thread
             SET is_following = ?2, last_reply_at = ?3, last_viewed_at = ?4, reply_count = ?5,
                 unread_mentions = ?6, unread_replies = ?7, viewed_at = ?8
             WHERE id = ?1",
            params![
                self.id,
                self.is_following,
                self.last_reply_at,
                self.last_viewed_at,
                self.reply_count,
                self.unread_mentions,
                self.unread_replies,
                self.viewed_at,
            ],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::Thread(self)
    }
}

impl LocalRecord for ThreadParticipant {
    const TABLE: Table = Table::ThreadParticipant;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, PARTICIPANT_SELECT, "id", ids, row_to_participant)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO ThreadParticipant (id, thread_id, user_id) VALUES (?1, ?2, ?3)",
            params![self.id, self.thread_id, self.user_id],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE ThreadParticipant SET thread_id = ?2, user_id = ?3 WHERE id = ?1",
            params![self.id, self.thread_id, self.user_id],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::ThreadParticipant(self)
    }
}

impl LocalRecord for ThreadInTeam {
    const TABLE: Table = Table::ThreadsInTeam;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, THREAD_IN_TEAM_SELECT, "id", ids, row_to_thread_in_team)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO ThreadsInTeam (id, thread_id, team_id, loaded_in_global_threads)
             VALUES (?1, ?2, ?3, ?4)",
            params![self.id, self.thread_id, self.team_id, self.loaded_in_global_threads],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE ThreadsInTeam SET thread_id = ?2, team_id = ?3, loaded_in_global_threads = ?4
             WHERE id = ?1",
            params![self.id, self.thread_id, self.team_id, self.loaded_in_global_threads],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::ThreadInTeam(self)
    }
}

impl Database {
    pub fn get_thread(&self, id: &str) -> Result<Thread> {
        get_one::<Thread>(self.conn(), id)
    }

    /// Participants of one thread, ordered by user id.
    pub fn list_thread_participants(&self, thread_id: &str) -> Result<Vec<ThreadParticipant>> {
        let mut participants = participants_of_threads(self.conn(), &[thread_id.to_string()])?;
        participants.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(participants)
    }

    /// Team associations of one thread.
    pub fn list_thread_teams(&self, thread_id: &str) -> Result<Vec<ThreadInTeam>> {
        teams_of_threads(self.conn(), &[thread_id.to_string()])
    }

    /// Threads associated with a team, most recent reply first.
    pub fn list_threads_in_team(&self, team_id: &str) -> Result<Vec<Thread>> {
        let mut stmt = self.conn().prepare(
            "SELECT t.id, t.is_following, t.last_reply_at, t.last_viewed_at, t.reply_count,
                    t.unread_mentions, t.unread_replies, t.viewed_at
             FROM Thread t
             JOIN ThreadsInTeam tt ON tt.thread_id = t.id
             WHERE tt.team_id = ?1
             ORDER BY t.last_reply_at DESC",
        )?;
        let rows = stmt.query_map(params![team_id], row_to_thread)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }
}

/// Every stored participant of the given threads.
pub(crate) fn participants_of_threads(
    conn: &Connection,
    thread_ids: &[String],
) -> Result<Vec<ThreadParticipant>> {
    fetch_where_in(conn, PARTICIPANT_SELECT, "thread_id", thread_ids, row_to_participant)
}

/// Every stored team association of the given threads.
pub(crate) fn teams_of_threads(conn: &Connection, thread_ids: &[String]) -> Result<Vec<ThreadInTeam>> {
    fetch_where_in(conn, THREAD_IN_TEAM_SELECT, "thread_id", thread_ids, row_to_thread_in_team)
}

fn row_to_thread(row: &rusqlite::Row<'_>) -> rusqlite::Result<Thread> {
    Ok(Thread {
        id: row.get(0)?,
        is_following: row.get(1)?,
        last_reply_at: row.get(2)?,
        last_viewed_at: row.get(3)?,
        reply_count: row.get(4)?,
        unread_mentions: row.get(5)?,
        unread_replies: row.get(6)?,
        viewed_at: row.get(7)?,
    })
}

fn row_to_participant(row: &rusqlite::Row<'_>) -> rusqlite::Result<ThreadParticipant> {
    Ok(ThreadParticipant {
        id: row.get(0)?,
        thread_id: row.get(1)?,
        user_id: row.get(2)?,
    })
}

fn row_to_thread_in_team(row: &rusqlite::Row<'_>) -> rusqlite::Result<ThreadInTeam> {
    Ok(ThreadInTeam {
        id: row.get(0)?,
        thread_id: row.get(1)?,
        team_id: row.get(2)?,
        loaded_in_global_threads: row.get(3)?,
    })
}
