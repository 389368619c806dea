//! # huddle-store
//!
//! Offline-first local store for the Huddle client.
//!
//! Raw payloads received from a chat server are reconciled into a
//! per-server SQLite database: deduplicated, compared with what is already
//! stored, and turned into create, update or destroy mutations that are
//! committed in a single transaction.
//!
//! The [`DataOperator`] is the entry point. [`runtime::spawn_operator`]
//! moves one onto a dedicated writer thread for async callers.

pub mod channels;
pub mod config;
pub mod database;
pub mod general;
pub mod migrations;
pub mod models;
pub mod mutation;
pub mod operator;
pub mod reactions;
pub mod runtime;
pub mod threads;
pub mod users;
pub mod writer;

mod error;

pub use config::StoreConfig;
pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
pub use mutation::{Action, PreparedMutation, Record};
pub use operator::{DataOperator, Reconcile, WriteMode};
pub use runtime::{spawn_operator, OperatorHandle, StoreEvent};
pub use writer::BatchWriter;
