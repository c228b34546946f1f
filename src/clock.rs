//! Wall-clock helpers bridging `time` and the `chrono` types Sea-ORM stores.

use sea_orm::prelude::DateTimeWithTimeZone;
use time::OffsetDateTime;

/// Current instant as a database timestamp.
pub(crate) fn now() -> DateTimeWithTimeZone {
    to_db(OffsetDateTime::now_utc())
}

// time::OffsetDateTime -> sea_orm::prelude::DateTimeWithTimeZone (chrono)
pub(crate) fn to_db(at: OffsetDateTime) -> DateTimeWithTimeZone {
    use chrono::{DateTime, Utc};

    // Always stored as UTC, whatever offset `at` carries
    match DateTime::from_timestamp(at.unix_timestamp(), at.nanosecond()) {
        Some(datetime) => datetime.into(),
        // Out of chrono's range; saturate rather than fail a request over it
        None if at.unix_timestamp() < 0 => DateTime::<Utc>::MIN_UTC.into(),
        None => DateTime::<Utc>::MAX_UTC.into(),
    }
}
