//! Database access for brandhub-web
//!
//! Thin query layer over the shared schema. Ids are stored as UUID text and
//! timestamps as RFC 3339 text; ownership is checked by the callers.

pub mod assets;
pub mod brands;
pub mod launches;
pub mod subscriptions;

use brandhub_common::{Error, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| Error::Persistence(format!("Invalid {} '{}': {}", column, value, e)))
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    brandhub_common::time::parse_db_timestamp(value)
}
