//! Storage for [`Role`], [`System`], [`Config`] and [`CustomEmoji`] records.

use huddle_shared::types::Table;
use rusqlite::{params, Connection};

use crate::channels::get_one;
use crate::database::{fetch_where_in, json_column, Database};
use crate::error::Result;
use crate::models::{Config, CustomEmoji, Role, System};
use crate::mutation::{expect_one, LocalRecord, Record};

const ROLE_SELECT: &str = "SELECT id, name, permissions FROM Role";

const SYSTEM_SELECT: &str = "SELECT id, value FROM System";

const CONFIG_SELECT: &str = "SELECT id, value FROM Config";

const CUSTOM_EMOJI_SELECT: &str = "SELECT id, emoji_id, creator_id FROM CustomEmoji";

impl LocalRecord for Role {
    const TABLE: Table = Table::Role;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, ROLE_SELECT, "id", ids, row_to_role)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO Role (id, name, permissions) VALUES (?1, ?2, ?3)",
            params![self.id, self.name, permissions_json(&self.permissions)],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE Role SET name = ?2, permissions = ?3 WHERE id = ?1",
            params![self.id, self.name, permissions_json(&self.permissions)],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::Role(self)
    }
}

impl LocalRecord for System {
    const TABLE: Table = Table::System;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, SYSTEM_SELECT, "id", ids, row_to_system)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO System (id, value) VALUES (?1, ?2)",
            params![self.id, self.value.to_string()],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE System SET value = ?2 WHERE id = ?1",
            params![self.id, self.value.to_string()],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::System(self)
    }
}

impl LocalRecord for Config {
    const TABLE: Table = Table::Config;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, CONFIG_SELECT, "id", ids, |row| {
            Ok(Config {
                id: row.get(0)?,
                value: row.get(1)?,
            })
        })
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO Config (id, value) VALUES (?1, ?2)",
            params![self.id, self.value],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE Config SET value = ?2 WHERE id = ?1",
            params![self.id, self.value],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::Config(self)
    }
}

impl LocalRecord for CustomEmoji {
    const TABLE: Table = Table::CustomEmoji;

    fn id(&self) -> &str {
        &self.name
    }

    fn fetch_by_ids(conn: &Connection, names: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, CUSTOM_EMOJI_SELECT, "id", names, |row| {
            Ok(CustomEmoji {
                name: row.get(0)?,
                emoji_id: row.get(1)?,
                creator_id: row.get(2)?,
            })
        })
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO CustomEmoji (id, emoji_id, creator_id) VALUES (?1, ?2, ?3)",
            params![self.name, self.emoji_id, self.creator_id],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE CustomEmoji SET emoji_id = ?2, creator_id = ?3 WHERE id = ?1",
            params![self.name, self.emoji_id, self.creator_id],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::CustomEmoji(self)
    }
}

impl Database {
    pub fn get_config(&self, id: &str) -> Result<Config> {
        get_one::<Config>(self.conn(), id)
    }

    pub fn get_custom_emoji(&self, name: &str) -> Result<CustomEmoji> {
        get_one::<CustomEmoji>(self.conn(), name)
    }

    pub fn get_role(&self, id: &str) -> Result<Role> {
        get_one::<Role>(self.conn(), id)
    }

    pub fn get_system(&self, id: &str) -> Result<System> {
        get_one::<System>(self.conn(), id)
    }
}

// a Vec<String> always serializes
fn permissions_json(permissions: &[String]) -> String {
    serde_json::Value::from(permissions.to_vec()).to_string()
}

fn row_to_role(row: &rusqlite::Row<'_>) -> rusqlite::Result<Role> {
    let permissions = match json_column(row, 2)? {
        serde_json::Value::Array(values) => values
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    Ok(Role {
        id: row.get(0)?,
        name: row.get(1)?,
        permissions,
    })
}

fn row_to_system(row: &rusqlite::Row<'_>) -> rusqlite::Result<System> {
    Ok(System {
        id: row.get(0)?,
        value: json_column(row, 1)?,
    })
}
