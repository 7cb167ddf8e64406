//! Storage key derivation.
//!
//! Per-day records live under `health-tracker-YYYY-MM-DD`; the single goals
//! value lives under `health-tracker-goals`. Everything else sharing the
//! prefix belongs to the record namespace and is subject to the sweep.

use time::macros::format_description;
use time::{Date, OffsetDateTime};

use hydra_types::iso_date;

/// Prefix shared by every key this crate writes.
pub const KEY_PREFIX: &str = "health-tracker-";

/// Key of the goal settings. `goals` never parses as a date.
pub const GOALS_KEY: &str = "health-tracker-goals";

/// Key of the record for the calendar day of `at`, in `at`'s own offset.
pub fn date_key(at: OffsetDateTime) -> String {
    format!("{}{}", KEY_PREFIX, iso_date(at.date()))
}

/// Key of the goal settings.
pub fn goals_key() -> &'static str {
    GOALS_KEY
}

/// Whether `key` belongs to the per-day record namespace.
pub fn is_record_key(key: &str) -> bool {
    key.starts_with(KEY_PREFIX) && key != GOALS_KEY
}

/// The calendar day encoded in a record key.
pub fn key_date(key: &str) -> Option<Date> {
    let suffix = key.strip_prefix(KEY_PREFIX)?;
    Date::parse(suffix, format_description!("[year]-[month]-[day]")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_date_key_format() {
        assert_eq!(
            date_key(datetime!(2026-03-07 12:00:00 UTC)),
            "health-tracker-2026-03-07"
        );
    }

    #[test]
    fn test_date_key_changes_at_midnight() {
        let before = date_key(datetime!(2026-10-18 23:59:59 UTC));
        let after = date_key(datetime!(2026-10-19 00:00:01 UTC));
        assert_ne!(before, after);
        assert_eq!(after, "health-tracker-2026-10-19");
    }

    #[test]
    fn test_date_key_uses_local_day() {
        // 22:30 UTC is already the next day at +02:00
        let at = datetime!(2026-10-18 22:30:00 UTC);
        assert_eq!(date_key(at), "health-tracker-2026-10-18");
        assert_eq!(
            date_key(at.to_offset(time::macros::offset!(+2))),
            "health-tracker-2026-10-19"
        );
    }

    #[test]
    fn test_goals_key_is_outside_record_namespace() {
        assert!(!is_record_key(goals_key()));
        assert_eq!(key_date(goals_key()), None);
        assert!(is_record_key("health-tracker-2026-10-18"));
        assert!(is_record_key("health-tracker-garbage"));
        assert!(!is_record_key("other-app-2026-10-18"));
    }

    #[test]
    fn test_key_date_parses_own_keys() {
        assert_eq!(
            key_date("health-tracker-2026-02-28"),
            Some(date!(2026 - 02 - 28))
        );
        assert_eq!(key_date("health-tracker-2026-02-30"), None);
        assert_eq!(key_date("unrelated"), None);
    }

    proptest! {
        #[test]
        fn date_key_stable_within_a_day(first in 0i64..86_400, second in 0i64..86_400) {
            let midnight = datetime!(2026-10-18 00:00:00 UTC);
            let a = midnight + time::Duration::seconds(first);
            let b = midnight + time::Duration::seconds(second);
            prop_assert_eq!(date_key(a), date_key(b));
        }

        #[test]
        fn date_key_never_collides_with_goals(secs in 0i64..4_000_000_000) {
            let at = OffsetDateTime::from_unix_timestamp(secs).unwrap();
            let key = date_key(at);
            prop_assert_ne!(key.as_str(), GOALS_KEY);
            prop_assert_eq!(key_date(&key), Some(at.date()));
        }
    }
}
