//! Storage for [`User`] and [`Preference`] records.

use huddle_shared::types::Table;
use rusqlite::{params, Connection};

use crate::channels::get_one;
use crate::database::{fetch_where_in, json_column, Database};
use crate::error::Result;
use crate::models::{Preference, User};
use crate::mutation::{expect_one, LocalRecord, Record};

const USER_SELECT: &str = "SELECT id, auth_service, update_at, delete_at, email, first_name, is_bot,
        is_guest, last_name, last_picture_update, locale, nickname, position, roles, status,
        username, notify_props, props, timezone, remote_id
 FROM User";

const PREFERENCE_SELECT: &str = "SELECT id, category, name, user_id, value FROM Preference";

impl LocalRecord for User {
    const TABLE: Table = Table::User;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, USER_SELECT, "id", ids, row_to_user)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO User (id, auth_service, update_at, delete_at, email, first_name, is_bot,
                               is_guest, last_name, last_picture_update, locale, nickname,
                               position, roles, status, username, notify_props, props,
                               timezone, remote_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                     ?17, ?18, ?19, ?20)",
            params![
                self.id,
                self.auth_service,
                self.update_at,
                self.delete_at,
                self.email,
                self.first_name,
                self.is_bot,
                self.is_guest,
                self.last_name,
                self.last_picture_update,
                self.locale,
                self.nickname,
                self.position,
                self.roles,
                self.status,
                self.username,
                self.notify_props.to_string(),
                self.props.to_string(),
                self.timezone.to_string(),
                self.remote_id,
            ],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE User
             SET auth_service = ?2, update_at = ?3, delete_at = ?4, email = ?5, first_name = ?6,
                 is_bot = ?7, is_guest = ?8, last_name = ?9, last_picture_update = ?10,
                 locale = ?11, nickname = ?12, position = ?13, roles = ?14, status = ?15,
                 username = ?16, notify_props = ?17, props = ?18, timezone = ?19,
                 remote_id = ?20
             WHERE id = ?1",
            params![
                self.id,
                self.auth_service,
                self.update_at,
                self.delete_at,
                self.email,
                self.first_name,
                self.is_bot,
                self.is_guest,
                self.last_name,
                self.last_picture_update,
                self.locale,
                self.nickname,
                self.position,
                self.roles,
                self.status,
                self.username,
                self.notify_props.to_string(),
                self.props.to_string(),
                self.timezone.to_string(),
                self.remote_id,
            ],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::User(self)
    }
}

impl LocalRecord for Preference {
    const TABLE: Table = Table::Preference;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, PREFERENCE_SELECT, "id", ids, row_to_preference)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO Preference (id, category, name, user_id, value)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![self.id, self.category, self.name, self.user_id, self.value],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE Preference SET category = ?2, name = ?3, user_id = ?4, value = ?5
             WHERE id = ?1",
            params![self.id, self.category, self.name, self.user_id, self.value],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::Preference(self)
    }
}

impl Database {
    pub fn get_user(&self, id: &str) -> Result<User> {
        get_one::<User>(self.conn(), id)
    }

    /// Preferences of one user, ordered by category then name.
    pub fn list_preferences(&self, user_id: &str) -> Result<Vec<Preference>> {
        let mut prefs = preferences_of_users(self.conn(), &[user_id.to_string()])?;
        prefs.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        Ok(prefs)
    }
}

/// Every stored preference belonging to one of `user_ids`.
fn preferences_of_users(conn: &Connection, user_ids: &[String]) -> Result<Vec<Preference>> {
    fetch_where_in(conn, PREFERENCE_SELECT, "user_id", user_ids, row_to_preference)
}

/// Every stored preference, whoever it belongs to.
pub(crate) fn all_preferences(conn: &Connection) -> Result<Vec<Preference>> {
    let mut stmt = conn.prepare_cached(PREFERENCE_SELECT)?;
    let rows = stmt.query_map([], row_to_preference)?;
    let mut prefs = Vec::new();
    for row in rows {
        prefs.push(row?);
    }
    Ok(prefs)
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        auth_service: row.get(1)?,
        update_at: row.get(2)?,
        delete_at: row.get(3)?,
        email: row.get(4)?,
        first_name: row.get(5)?,
        is_bot: row.get(6)?,
        is_guest: row.get(7)?,
        last_name: row.get(8)?,
        last_picture_update: row.get(9)?,
        locale: row.get(10)?,
        nickname: row.get(11)?,
        position: row.get(12)?,
        roles: row.get(13)?,
        status: row.get(14)?,
        username: row.get(15)?,
        notify_props: json_column(row, 16)?,
        props: json_column(row, 17)?,
        timezone: json_column(row, 18)?,
        remote_id: row.get(19)?,
    })
}

fn row_to_preference(row: &rusqlite::Row<'_>) -> rusqlite::Result<Preference> {
    Ok(Preference {
        id: row.get(0)?,
        category: row.get(1)?,
        name: row.get(2)?,
        user_id: row.get(3)?,
        value: row.get(4)?,
    })
}
