//! Freshness policy for the cached feed snapshot.

use chrono::{DateTime, Duration, Utc};

const MAX_CACHE_AGE_DAYS: i64 = 7;

/// Returns whether a snapshot written at `timestamp` is still fresh at `now`.
///
/// A snapshot that is exactly the max age old is no longer fresh: validity
/// is `now < timestamp + 7 days`, strictly.
pub fn is_fresh(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
  now < timestamp + Duration::days(MAX_CACHE_AGE_DAYS)
}
