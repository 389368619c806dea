//! v001 -- Initial schema creation.
//!
//! One table per entity kind. Composite-key kinds store their synthesized
//! key in `id`; there is no other surrogate key. Cascades are performed by
//! the reconciliation engine, not by foreign keys, so dependent rows may be
//! written before their owner within one batch.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version    INTEGER PRIMARY KEY NOT NULL,
    name       TEXT NOT NULL,
    applied_at TEXT NOT NULL                    -- RFC-3339
);

-- ----------------------------------------------------------------
-- Channels
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS Channel (
    id                   TEXT PRIMARY KEY NOT NULL,   -- server id
    create_at            INTEGER NOT NULL,
    update_at            INTEGER NOT NULL,
    delete_at            INTEGER NOT NULL DEFAULT 0,
    creator_id           TEXT NOT NULL,
    display_name         TEXT NOT NULL,
    is_group_constrained INTEGER NOT NULL DEFAULT 0,  -- boolean 0/1
    name                 TEXT NOT NULL,
    team_id              TEXT NOT NULL,
    type                 TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_channel_team_id ON Channel(team_id);

CREATE TABLE IF NOT EXISTS ChannelMembership (
    id         TEXT PRIMARY KEY NOT NULL,             -- channel_id-user_id
    channel_id TEXT NOT NULL,
    user_id    TEXT NOT NULL,
    roles      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_channel_membership_channel ON ChannelMembership(channel_id);
CREATE INDEX IF NOT EXISTS idx_channel_membership_user ON ChannelMembership(user_id);

CREATE TABLE IF NOT EXISTS MyChannel (
    id             TEXT PRIMARY KEY NOT NULL,         -- channel id
    last_post_at   INTEGER NOT NULL,
    last_viewed_at INTEGER NOT NULL,
    mentions_count INTEGER NOT NULL,
    message_count  INTEGER NOT NULL,
    is_unread      INTEGER NOT NULL,                  -- boolean 0/1
    roles          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS MyChannelSettings (
    id           TEXT PRIMARY KEY NOT NULL,           -- channel id
    notify_props TEXT                                 -- JSON
);

-- ----------------------------------------------------------------
-- Threads
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS Thread (
    id              TEXT PRIMARY KEY NOT NULL,        -- root post id
    is_following    INTEGER NOT NULL,
    last_reply_at   INTEGER NOT NULL,
    last_viewed_at  INTEGER NOT NULL,
    reply_count     INTEGER NOT NULL,
    unread_mentions INTEGER NOT NULL,
    unread_replies  INTEGER NOT NULL,
    viewed_at       INTEGER NOT NULL DEFAULT 0        -- local only
);

CREATE TABLE IF NOT EXISTS ThreadParticipant (
    id        TEXT PRIMARY KEY NOT NULL,              -- thread_id-user_id
    thread_id TEXT NOT NULL,
    user_id   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_thread_participant_thread ON ThreadParticipant(thread_id);

CREATE TABLE IF NOT EXISTS ThreadsInTeam (
    id                       TEXT PRIMARY KEY NOT NULL,  -- thread_id-team_id
    thread_id                TEXT NOT NULL,
    team_id                  TEXT NOT NULL,
    loaded_in_global_threads INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_threads_in_team_thread ON ThreadsInTeam(thread_id);
CREATE INDEX IF NOT EXISTS idx_threads_in_team_team ON ThreadsInTeam(team_id);

-- ----------------------------------------------------------------
-- Users & preferences
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS User (
    id                  TEXT PRIMARY KEY NOT NULL,    -- server id
    auth_service        TEXT NOT NULL,
    update_at           INTEGER NOT NULL,
    delete_at           INTEGER NOT NULL,
    email               TEXT NOT NULL,
    first_name          TEXT NOT NULL,
    is_bot              INTEGER NOT NULL,
    is_guest            INTEGER NOT NULL,
    last_name           TEXT NOT NULL,
    last_picture_update INTEGER NOT NULL,
    locale              TEXT NOT NULL,
    nickname            TEXT NOT NULL,
    position            TEXT NOT NULL,
    roles               TEXT NOT NULL,
    status              TEXT NOT NULL DEFAULT '',
    username            TEXT NOT NULL,
    notify_props        TEXT,                         -- JSON
    props               TEXT,                         -- JSON
    timezone            TEXT,                         -- JSON
    remote_id           TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS Preference (
    id       TEXT PRIMARY KEY NOT NULL,               -- category-name-user_id
    category TEXT NOT NULL,
    name     TEXT NOT NULL,
    user_id  TEXT NOT NULL,
    value    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_preference_user ON Preference(user_id);

-- ----------------------------------------------------------------
-- Roles & system values
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS Role (
    id          TEXT PRIMARY KEY NOT NULL,
    name        TEXT NOT NULL,
    permissions TEXT NOT NULL                         -- JSON array
);

CREATE TABLE IF NOT EXISTS System (
    id    TEXT PRIMARY KEY NOT NULL,
    value TEXT                                        -- JSON
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
