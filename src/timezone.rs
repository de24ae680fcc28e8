use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the UTC offset of `canonical_timezone` (e.g. "Pacific/Auckland") at the instant `at`.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if `canonical_timezone` is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str, at: OffsetDateTime) -> Result<UtcOffset, Error> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&at).to_utc())
        .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))
}
