use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod common;
pub mod health;
pub mod live;
pub mod matches;
pub mod players;
pub mod sse;
pub mod teams;
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Parse an RFC 3339 timestamp into a [`SystemTime`].
pub(crate) fn parse_system_time(raw: &str) -> Option<SystemTime> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .map(SystemTime::from)
}
