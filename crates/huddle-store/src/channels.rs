//! Storage for [`Channel`], [`ChannelInfo`], [`ChannelMembership`],
//! [`MyChannel`] and [`MyChannelSettings`] records.

use huddle_shared::types::Table;
use rusqlite::{params, Connection};

use crate::database::{fetch_where_in, json_column, Database};
use crate::error::{Result, StoreError};
use crate::models::{Channel, ChannelInfo, ChannelMembership, MyChannel, MyChannelSettings};
use crate::mutation::{expect_one, LocalRecord, Record};

const CHANNEL_SELECT: &str = "SELECT id, create_at, update_at, delete_at, creator_id, display_name,
        is_group_constrained, name, team_id, type
 FROM Channel";

const CHANNEL_INFO_SELECT: &str = "SELECT id, header, purpose, member_count, guest_count,
        pinned_post_count
 FROM ChannelInfo";

const MEMBERSHIP_SELECT: &str = "SELECT id, channel_id, user_id, roles FROM ChannelMembership";

const MY_CHANNEL_SELECT: &str = "SELECT id, last_post_at, last_viewed_at, mentions_count,
        message_count, is_unread, roles
 FROM MyChannel";

const SETTINGS_SELECT: &str = "SELECT id, notify_props FROM MyChannelSettings";

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

impl LocalRecord for Channel {
    const TABLE: Table = Table::Channel;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, CHANNEL_SELECT, "id", ids, row_to_channel)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO Channel (id, create_at, update_at, delete_at, creator_id, display_name,
                                  is_group_constrained, name, team_id, type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                self.id,
                self.create_at,
                self.update_at,
                self.delete_at,
                self.creator_id,
                self.display_name,
                self.is_group_constrained,
                self.name,
                self.team_id,
                self.channel_type,
            ],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE Channel
             SET create_at = ?2, update_at = ?3, delete_at = ?4, creator_id = ?5,
                 display_name = ?6, is_group_constrained = ?7, name = ?8, team_id = ?9, type = ?10
             WHERE id = ?1",
            params![
                self.id,
                self.create_at,
                self.update_at,
                self.delete_at,
                self.creator_id,
                self.display_name,
                self.is_group_constrained,
                self.name,
                self.team_id,
                self.channel_type,
            ],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::Channel(self)
    }
}

// ---------------------------------------------------------------------------
// ChannelInfo
// ---------------------------------------------------------------------------

impl LocalRecord for ChannelInfo {
    const TABLE: Table = Table::ChannelInfo;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, CHANNEL_INFO_SELECT, "id", ids, row_to_channel_info)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO ChannelInfo (id, header, purpose, member_count, guest_count,
                                      pinned_post_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                self.id,
                self.header,
                self.purpose,
                self.member_count,
                self.guest_count,
                self.pinned_post_count,
            ],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE ChannelInfo
             SET header = ?2, purpose = ?3, member_count = ?4, guest_count = ?5,
                 pinned_post_count = ?6
             WHERE id = ?1",
            params![
                self.id,
                self.header,
                self.purpose,
                self.member_count,
                self.guest_count,
                self.pinned_post_count,
            ],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::ChannelInfo(self)
    }
}

// ---------------------------------------------------------------------------
// ChannelMembership
// ---------------------------------------------------------------------------

impl LocalRecord for ChannelMembership {
    const TABLE: Table = Table::ChannelMembership;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, MEMBERSHIP_SELECT, "id", ids, row_to_membership)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO ChannelMembership (id, channel_id, user_id, roles)
             VALUES (?1, ?2, ?3, ?4)",
            params![self.id, self.channel_id, self.user_id, self.roles],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE ChannelMembership SET channel_id = ?2, user_id = ?3, roles = ?4 WHERE id = ?1",
            params![self.id, self.channel_id, self.user_id, self.roles],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::ChannelMembership(self)
    }
}

// ---------------------------------------------------------------------------
// MyChannel
// ---------------------------------------------------------------------------

impl LocalRecord for MyChannel {
    const TABLE: Table = Table::MyChannel;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, MY_CHANNEL_SELECT, "id", ids, row_to_my_channel)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO MyChannel (id, last_post_at, last_viewed_at, mentions_count,
                                    message_count, is_unread, roles)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                self.id,
                self.last_post_at,
                self.last_viewed_at,
                self.mentions_count,
                self.message_count,
                self.is_unread,
                self.roles,
            ],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE MyChannel
             SET last_post_at = ?2, last_viewed_at = ?3, mentions_count = ?4,
                 message_count = ?5, is_unread = ?6, roles = ?7
             WHERE id = ?1",
            params![
                self.id,
                self.last_post_at,
                self.last_viewed_at,
                self.mentions_count,
                self.message_count,
                self.is_unread,
                self.roles,
            ],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::MyChannel(self)
    }
}

// ---------------------------------------------------------------------------
// MyChannelSettings
// ---------------------------------------------------------------------------

impl LocalRecord for MyChannelSettings {
    const TABLE: Table = Table::MyChannelSettings;

    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>> {
        fetch_where_in(conn, SETTINGS_SELECT, "id", ids, row_to_settings)
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO MyChannelSettings (id, notify_props) VALUES (?1, ?2)",
            params![self.id, self.notify_props.to_string()],
        )?;
        Ok(())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        let affected = conn.execute(
            "UPDATE MyChannelSettings SET notify_props = ?2 WHERE id = ?1",
            params![self.id, self.notify_props.to_string()],
        )?;
        expect_one(affected)
    }

    fn into_record(self) -> Record {
        Record::MyChannelSettings(self)
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl Database {
    /// Fetch a single channel by id.
    pub fn get_channel(&self, id: &str) -> Result<Channel> {
        get_one::<Channel>(self.conn(), id)
    }

    /// List the channels of a team, ordered by display name.
    pub fn list_channels_for_team(&self, team_id: &str) -> Result<Vec<Channel>> {
        let mut stmt = self.conn().prepare(&format!(
            "{CHANNEL_SELECT} WHERE team_id = ?1 ORDER BY display_name ASC"
        ))?;
        let rows = stmt.query_map(params![team_id], row_to_channel)?;

        let mut channels = Vec::new();
        for row in rows {
            channels.push(row?);
        }
        Ok(channels)
    }

    pub fn get_channel_info(&self, channel_id: &str) -> Result<ChannelInfo> {
        get_one::<ChannelInfo>(self.conn(), channel_id)
    }

    pub fn list_channel_memberships(&self, channel_id: &str) -> Result<Vec<ChannelMembership>> {
        let mut stmt = self.conn().prepare(&format!(
            "{MEMBERSHIP_SELECT} WHERE channel_id = ?1 ORDER BY user_id ASC"
        ))?;
        let rows = stmt.query_map(params![channel_id], row_to_membership)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    pub fn get_my_channel(&self, channel_id: &str) -> Result<MyChannel> {
        get_one::<MyChannel>(self.conn(), channel_id)
    }

    pub fn get_my_channel_settings(&self, channel_id: &str) -> Result<MyChannelSettings> {
        get_one::<MyChannelSettings>(self.conn(), channel_id)
    }
}

/// Fetch exactly one record by primary key.
pub(crate) fn get_one<T: LocalRecord>(conn: &Connection, id: &str) -> Result<T> {
    T::fetch_by_ids(conn, &[id.to_string()])?
        .into_iter()
        .next()
        .ok_or(StoreError::NotFound)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row_to_channel(row: &rusqlite::Row<'_>) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: row.get(0)?,
        create_at: row.get(1)?,
        update_at: row.get(2)?,
        delete_at: row.get(3)?,
        creator_id: row.get(4)?,
        display_name: row.get(5)?,
        is_group_constrained: row.get(6)?,
        name: row.get(7)?,
        team_id: row.get(8)?,
        channel_type: row.get(9)?,
    })
}

fn row_to_channel_info(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChannelInfo> {
    Ok(ChannelInfo {
        id: row.get(0)?,
        header: row.get(1)?,
        purpose: row.get(2)?,
        member_count: row.get(3)?,
        guest_count: row.get(4)?,
        pinned_post_count: row.get(5)?,
    })
}

fn row_to_membership(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChannelMembership> {
    Ok(ChannelMembership {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        user_id: row.get(2)?,
        roles: row.get(3)?,
    })
}

fn row_to_my_channel(row: &rusqlite::Row<'_>) -> rusqlite::Result<MyChannel> {
    Ok(MyChannel {
        id: row.get(0)?,
        last_post_at: row.get(1)?,
        last_viewed_at: row.get(2)?,
        mentions_count: row.get(3)?,
        message_count: row.get(4)?,
        is_unread: row.get(5)?,
        roles: row.get(6)?,
    })
}

fn row_to_settings(row: &rusqlite::Row<'_>) -> rusqlite::Result<MyChannelSettings> {
    Ok(MyChannelSettings {
        id: row.get(0)?,
        notify_props: json_column(row, 1)?,
    })
}
