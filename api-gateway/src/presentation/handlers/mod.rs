use chrono::{DateTime, Utc};
use prost_types::Timestamp;

pub(crate) mod auth;
pub(crate) mod comments;
pub(crate) mod posts;
pub(crate) mod users;

pub(crate) fn from_proto_timestamp(value: Option<Timestamp>) -> DateTime<Utc> {
    value
        .and_then(|ts| DateTime::from_timestamp(ts.seconds, ts.nanos.clamp(0, 999_999_999) as u32))
        .unwrap_or_default()
}
