//! Per-table handlers of [`DataOperator`](super::DataOperator).
//!
//! Entity handlers (channels, channel info, memberships, users,
//! preferences, reactions) reject an empty batch as a caller bug. Handlers
//! for roles, system values, configs, custom emojis and threads treat it as
//! a no-op and only log a warning.

mod channel;
mod general;
mod reaction;
mod thread;
mod user;

use crate::error::{Result, StoreError};

fn require_non_empty<T>(raws: &[T], what: &str, handler: &str) -> Result<()> {
    if raws.is_empty() {
        return Err(StoreError::Validation(format!(
            "an empty \"{what}\" array has been passed to {handler}"
        )));
    }
    Ok(())
}

fn warn_if_empty<T>(raws: &[T], what: &str, handler: &str) -> bool {
    if raws.is_empty() {
        tracing::warn!(handler = handler, "an empty \"{what}\" array has been passed");
        return true;
    }
    false
}
