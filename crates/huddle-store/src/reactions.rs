//! Storage for [`Reaction`] records.

use huddle_shared::types::Table;
use rusqlite::{params, Connection};

use crate::database::{fetch_where_in, Database};
use crate::error::Result;
use crate::models::Reaction;
use crate::mutation::{expect_one, LocalRecord, Record};

const REACTION_SELECT: &str = "SELECT id, post_id, user_id, emoji_name, create_at FROM Reaction";

impl LocalRecord for Reaction {
    const TABLE: Table = Table::Reaction;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, REACTION_SELECT, "id", ids, row_to_reaction)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO Reaction (id, post_id, user_id, emoji_name, create_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![self.id, self.post_id, self.user_id, self.emoji_name, self.create_at],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE Reaction SET post_id = ?2, user_id = ?3, emoji_name = ?4, create_at = ?5
             WHERE id = ?1",
            params![self.id, self.post_id, self.user_id, self.emoji_name, self.create_at],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::Reaction(self)
    }
}

impl Database {
    /// Reactions on one post, oldest first.
    pub fn list_reactions(&self, post_id: &str) -> Result<Vec<Reaction>> {
        let mut reactions = reactions_of_posts(self.conn(), &[post_id.to_string()])?;
        reactions.sort_by(|a, b| (a.create_at, &a.id).cmp(&(b.create_at, &b.id)));
        Ok(reactions)
    }
}

/// Every stored reaction on one of `post_ids`.
pub(crate) fn reactions_of_posts(conn: &Connection, post_ids: &[String]) -> Result<Vec<Reaction>> {
    fetch_where_in(conn, REACTION_SELECT, "post_id", post_ids, row_to_reaction)
}

fn row_to_reaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reaction> {
    Ok(Reaction {
        id: row.get(0)?,
        post_id: row.get(1)?,
        user_id: row.get(2)?,
        emoji_name: row.get(3)?,
        create_at: row.get(4)?,
    })
}
