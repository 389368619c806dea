use huddle_shared::raw::{RawConfig, RawCustomEmoji, RawRole, RawSystem};

use super::{record_id, Reconcile};
use crate::models::{Config, CustomEmoji, Role, System};
use crate::operator::comparators::{
    config_matches, custom_emoji_matches, role_matches, system_matches,
};

impl Reconcile for Role {
    type Raw = RawRole;

    fn local_id(raw: &RawRole) -> String {
        raw.id.clone()
    }

    fn is_same(&self, raw: &RawRole) -> bool {
        role_matches(self, raw)
    }

    fn transform(raw: &RawRole, existing: Option<&Self>) -> Self {
        Role {
            id: record_id(existing, || raw.id.clone()),
            name: raw.name.clone(),
            permissions: raw.permissions.clone(),
        }
    }
}

impl Reconcile for System {
    type Raw = RawSystem;

    fn local_id(raw: &RawSystem) -> String {
        raw.id.clone()
    }

    fn is_same(&self, raw: &RawSystem) -> bool {
        system_matches(self, raw)
    }

    fn transform(raw: &RawSystem, existing: Option<&Self>) -> Self {
        System {
            id: record_id(existing, || raw.id.clone()),
            value: raw.value.clone(),
        }
    }
}

impl Reconcile for Config {
    type Raw = RawConfig;

    fn local_id(raw: &RawConfig) -> String {
        raw.id.clone()
    }

    fn is_same(&self, raw: &RawConfig) -> bool {
        config_matches(self, raw)
    }

    fn transform(raw: &RawConfig, existing: Option<&Self>) -> Self {
        Config {
            id: record_id(existing, || raw.id.clone()),
            value: raw.value.clone(),
        }
    }
}

impl Reconcile for CustomEmoji {
    type Raw = RawCustomEmoji;

    fn local_id(raw: &RawCustomEmoji) -> String {
        raw.name.clone()
    }

    fn is_same(&self, raw: &RawCustomEmoji) -> bool {
        custom_emoji_matches(self, raw)
    }

    fn transform(raw: &RawCustomEmoji, existing: Option<&Self>) -> Self {
        CustomEmoji {
            name: record_id(existing, || raw.name.clone()),
            emoji_id: raw.id.clone(),
            creator_id: raw.creator_id.clone(),
        }
    }
}
