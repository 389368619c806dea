//! Raw-to-record mapping.
//!
//! Every reconcilable record type implements [`Reconcile`], which ties
//! together the three pieces a handler needs: the local key of a raw, the
//! identity comparator, and the transformer that produces the record to
//! write.

mod channel;
mod general;
mod reaction;
mod thread;
mod user;

use crate::mutation::LocalRecord;

/// A record type that can be reconciled from raws of type `Raw`.
pub trait Reconcile: LocalRecord {
    type Raw;

    /// Local primary key the raw maps to.
    fn local_id(raw: &Self::Raw) -> String;

    /// Whether the raw carries every field its key is built from. A raw
    /// without them cannot be matched with a stored record.
    fn is_identified(raw: &Self::Raw) -> bool {
        !Self::local_id(raw).trim().is_empty()
    }

    /// Whether the stored record and the raw denote the same entity.
    fn is_same(&self, raw: &Self::Raw) -> bool;

    /// Build the record to write. `existing` is the stored record when the
    /// write is an update; its id and local-only fields must be kept.
    fn transform(raw: &Self::Raw, existing: Option<&Self>) -> Self;
}

fn all_present(parts: &[&str]) -> bool {
    parts.iter().all(|part| !part.trim().is_empty())
}

/// The stored id on update, a freshly derived one on create.
fn record_id<T: LocalRecord>(existing: Option<&T>, fresh: impl FnOnce() -> String) -> String {
    existing.map_or_else(fresh, |record| record.id().to_string())
}
