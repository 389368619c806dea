//! Prepared mutations: in-memory descriptions of writes that are not yet
//! durable.
//!
//! Handlers produce `Vec<PreparedMutation>`; the [`BatchWriter`] commits a
//! list of them in one transaction. Lists from several tables can be
//! concatenated before committing.
//!
//! [`BatchWriter`]: crate::writer::BatchWriter

use huddle_shared::types::Table;
use rusqlite::Connection;

use crate::database::delete_by_id;
use crate::error::Result;
use crate::models::{
    Channel, ChannelInfo, ChannelMembership, Config, CustomEmoji, MyChannel, MyChannelSettings,
    Preference, Reaction, Role, System, Thread, ThreadInTeam, ThreadParticipant, User,
};

/// Storage capability of a local record type: where it lives and how a
/// single row is read and written.
pub trait LocalRecord: Clone + Sized {
    const TABLE: Table;

    /// Local primary key.
    fn id(&self) -> &str;

    /// Load every stored record whose primary key is in `ids`. Missing ids
    /// are skipped.
    fn fetch_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Self>>;

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()>;

    /// Overwrite the stored row with the same primary key. Fails with
    /// `QueryReturnedNoRows` if the row is gone.
    fn update(&self, conn: &Connection) -> rusqlite::Result<()>;

    fn into_record(self) -> Record;
}

/// Any local record, tagged with its table.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Channel(Channel),
    ChannelInfo(ChannelInfo),
    ChannelMembership(ChannelMembership),
    Config(Config),
    CustomEmoji(CustomEmoji),
    MyChannel(MyChannel),
    MyChannelSettings(MyChannelSettings),
    Preference(Preference),
    Reaction(Reaction),
    Role(Role),
    System(System),
    Thread(Thread),
    ThreadParticipant(ThreadParticipant),
    ThreadInTeam(ThreadInTeam),
    User(User),
}

macro_rules! each_record {
    ($value:expr, $r:ident => $body:expr) => {
        match $value {
            Record::Channel($r) => $body,
            Record::ChannelInfo($r) => $body,
            Record::ChannelMembership($r) => $body,
            Record::Config($r) => $body,
            Record::CustomEmoji($r) => $body,
            Record::MyChannel($r) => $body,
            Record::MyChannelSettings($r) => $body,
            Record::Preference($r) => $body,
            Record::Reaction($r) => $body,
            Record::Role($r) => $body,
            Record::System($r) => $body,
            Record::Thread($r) => $body,
            Record::ThreadParticipant($r) => $body,
            Record::ThreadInTeam($r) => $body,
            Record::User($r) => $body,
        }
    };
}

impl Record {
    pub fn table(&self) -> Table {
        fn table_of<T: LocalRecord>(_: &T) -> Table {
            T::TABLE
        }
        each_record!(self, r => table_of(r))
    }

    pub fn id(&self) -> &str {
        each_record!(self, r => r.id())
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        each_record!(self, r => r.insert(conn))
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<()> {
        each_record!(self, r => r.update(conn))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Destroy,
}

/// One write, prepared but not yet committed.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedMutation {
    Create(Record),
    Update(Record),
    /// Permanent removal of the row `id` from `table`.
    Destroy { table: Table, id: String },
}

impl PreparedMutation {
    pub fn destroy<T: LocalRecord>(record: &T) -> Self {
        PreparedMutation::Destroy {
            table: T::TABLE,
            id: record.id().to_string(),
        }
    }

    pub fn action(&self) -> Action {
        match self {
            PreparedMutation::Create(_) => Action::Create,
            PreparedMutation::Update(_) => Action::Update,
            PreparedMutation::Destroy { .. } => Action::Destroy,
        }
    }

    pub fn table(&self) -> Table {
        match self {
            PreparedMutation::Create(r) | PreparedMutation::Update(r) => r.table(),
            PreparedMutation::Destroy { table, .. } => *table,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            PreparedMutation::Create(r) | PreparedMutation::Update(r) => r.id(),
            PreparedMutation::Destroy { id, .. } => id,
        }
    }

    /// The record being written, `None` for a destroy.
    pub fn record(&self) -> Option<&Record> {
        match self {
            PreparedMutation::Create(r) | PreparedMutation::Update(r) => Some(r),
            PreparedMutation::Destroy { .. } => None,
        }
    }

    pub(crate) fn apply(&self, conn: &Connection) -> rusqlite::Result<()> {
        match self {
            PreparedMutation::Create(r) => r.insert(conn),
            PreparedMutation::Update(r) => r.update(conn),
            PreparedMutation::Destroy { table, id } => {
                // destroying an already missing row is not an error
                delete_by_id(conn, *table, id).map(|_| ())
            }
        }
    }
}

/// Fail an UPDATE that touched no row.
pub(crate) fn expect_one(affected: usize) -> rusqlite::Result<()> {
    if affected == 0 {
        Err(rusqlite::Error::QueryReturnedNoRows)
    } else {
        Ok(())
    }
}
