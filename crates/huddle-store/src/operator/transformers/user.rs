use huddle_shared::raw::{RawPreference, RawUser};

use super::{all_present, record_id, Reconcile};
use crate::models::{Preference, User};
use crate::operator::comparators::{preference_matches, user_matches};
use crate::operator::keys::preference_key;

const GUEST_ROLE: &str = "system_guest";

impl Reconcile for User {
    type Raw = RawUser;

    fn local_id(raw: &RawUser) -> String {
        raw.id.clone()
    }

    fn is_same(&self, raw: &RawUser) -> bool {
        user_matches(self, raw)
    }

    fn transform(raw: &RawUser, existing: Option<&Self>) -> Self {
        // presence comes from its own endpoint; user payloads usually lack it
        let status = match &raw.status {
            Some(status) => status.clone(),
            None => existing.map(|e| e.status.clone()).unwrap_or_default(),
        };

        User {
            id: record_id(existing, || raw.id.clone()),
            auth_service: raw.auth_service.clone(),
            update_at: raw.update_at,
            delete_at: raw.delete_at,
            email: raw.email.clone(),
            first_name: raw.first_name.clone(),
            is_bot: raw.is_bot,
            is_guest: raw.roles.split_whitespace().any(|role| role == GUEST_ROLE),
            last_name: raw.last_name.clone(),
            last_picture_update: raw.last_picture_update,
            locale: raw.locale.clone(),
            nickname: raw.nickname.clone(),
            position: raw.position.clone().unwrap_or_default(),
            roles: raw.roles.clone(),
            status,
            username: raw.username.clone(),
            notify_props: raw.notify_props.clone(),
            props: raw.props.clone(),
            timezone: raw.timezone.clone(),
            remote_id: raw.remote_id.clone().unwrap_or_default(),
        }
    }
}

impl Reconcile for Preference {
    type Raw = RawPreference;

    fn local_id(raw: &RawPreference) -> String {
        preference_key(&raw.category, &raw.name, &raw.user_id)
    }

    fn is_identified(raw: &RawPreference) -> bool {
        all_present(&[&raw.category, &raw.name, &raw.user_id])
    }

    fn is_same(&self, raw: &RawPreference) -> bool {
        preference_matches(self, raw)
    }

    fn transform(raw: &RawPreference, existing: Option<&Self>) -> Self {
        Preference {
            id: record_id(existing, || Self::local_id(raw)),
            category: raw.category.clone(),
            name: raw.name.clone(),
            user_id: raw.user_id.clone(),
            value: raw.value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_user() -> RawUser {
        RawUser {
            id: "u1".to_string(),
            username: "alice".to_string(),
            roles: "system_user system_guest".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn guest_flag_follows_roles() {
        assert!(User::transform(&raw_user(), None).is_guest);

        let mut raw = raw_user();
        raw.roles = "system_user".to_string();
        assert!(!User::transform(&raw, None).is_guest);
    }

    #[test]
    fn stored_status_is_kept_when_payload_has_none() {
        let mut stored = User::transform(&raw_user(), None);
        stored.status = "online".to_string();

        let updated = User::transform(&raw_user(), Some(&stored));
        assert_eq!(updated.status, "online");

        let mut away = raw_user();
        away.status = Some("away".to_string());
        assert_eq!(User::transform(&away, Some(&stored)).status, "away");
    }
}
