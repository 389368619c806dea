//! v002 -- Channel info, configuration entries, custom emojis and reactions.

use rusqlite::Connection;

/// SQL executed when upgrading from version 1 to version 2.
const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS ChannelInfo (
    id                TEXT PRIMARY KEY NOT NULL,      -- channel id
    header            TEXT NOT NULL DEFAULT '',
    purpose           TEXT NOT NULL DEFAULT '',
    member_count      INTEGER NOT NULL DEFAULT 0,
    guest_count       INTEGER NOT NULL DEFAULT 0,
    pinned_post_count INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS Config (
    id    TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS CustomEmoji (
    id         TEXT PRIMARY KEY NOT NULL,             -- emoji name
    emoji_id   TEXT NOT NULL,                         -- server id
    creator_id TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS Reaction (
    id         TEXT PRIMARY KEY NOT NULL,             -- post_id-user_id-emoji_name
    post_id    TEXT NOT NULL,
    user_id    TEXT NOT NULL,
    emoji_name TEXT NOT NULL,
    create_at  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reaction_post_id ON Reaction(post_id);
"#;

/// Apply the migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
