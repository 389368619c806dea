//! # huddle-shared
//!
//! Types shared between the network layer and the local store: the raw
//! payload shapes received from the server, table names, and the small set of
//! constants both sides agree on.

pub mod constants;
pub mod error;
pub mod raw;
pub mod types;
