//! Next service date resolution
//!
//! A vehicle's upcoming service date is derived from its service records on
//! every read and never stored.

use chrono::{DateTime, Utc};

use crate::models::service::ServiceRecord;

/// Earliest `next_service_date` strictly after `now`, if any record has one.
pub fn resolve_next_service_date<'a, I>(records: I, now: DateTime<Utc>) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = &'a ServiceRecord>,
{
    records
        .into_iter()
        .filter_map(|record| record.next_service_date)
        .filter(|date| *date > now)
        .min()
}
