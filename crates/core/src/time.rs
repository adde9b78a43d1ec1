//! Utility module for working with timestamps and getting the current time.

#[cfg(not(feature = "std"))]
use crate::no_std::*;

//re-export time::Error since we use it, so other libraries can implement From<time::Error>
pub use time::Error;
use time::{Duration, OffsetDateTime, UtcOffset};

/// Number of seconds between the Windows FILETIME epoch (1601-01-01 00:00:00 UTC) and the Unix
/// epoch (1970-01-01 00:00:00 UTC).
const FILETIME_EPOCH_OFFSET_SECONDS: i64 = 11_644_473_600;

/// Converts a Windows FILETIME (100-nanosecond ticks since 1601-01-01 UTC) into an
/// [`OffsetDateTime`].
///
/// A raw value of `0` has no meaningful timestamp under FILETIME's own rules and is returned as
/// [`None`] rather than resolved to the 1601 epoch.
///
/// # Errors
/// Returns [`ComponentRange`](time::Error::ComponentRange) if the resulting timestamp falls
/// outside the range [`OffsetDateTime`] can represent.
#[inline]
pub fn filetime_to_datetime(ticks: u64) -> time::Result<Option<OffsetDateTime>> {
    if ticks == 0 {
        return Ok(None);
    }

    let ticks = i128::from(ticks);
    let seconds = i64::try_from(ticks / 10_000_000).unwrap_or(i64::MAX) - FILETIME_EPOCH_OFFSET_SECONDS;
    let nanos = i64::try_from((ticks % 10_000_000) * 100).unwrap_or_default();

    let timestamp = OffsetDateTime::from_unix_timestamp(seconds)?;
    Ok(Some(timestamp + Duration::nanoseconds(nanos)))
}

/// Returns a formatted [String] with the current time.
/// 
/// Note that this may be the local time, or may be based off UTC. If it matters, check whether
/// [`get_local_offset`] returns an error.
#[must_use]
#[inline]
pub fn current_time() -> String {
    let time = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format!("{}-{}-{} {}:{}:{}", time.year(), time.month() as u8, time.day(), time.hour(), time.minute(), time.second())
}

/// Convert a timestamp into a formatted [`String`].
///
/// # Errors
/// Returns [`ComponentRange`](time::Error::ComponentRange) if unable to convert the timestamp to a
/// valid date.
#[inline]
pub fn format_timestamp(timestamp: i64) -> time::Result<String> {
    let time = OffsetDateTime::from_unix_timestamp(timestamp)?;
    Ok(format!("{}-{}-{} {}:{}:{}", time.year(), time.month() as u8, time.day(), time.hour(), time.minute(), time.second()))
}

/// Returns the local time zone offset. This is useful for testing if the current system supports
/// local time, or only UTC is available.
///
/// # Errors
/// Returns [`IndeterminateOffset`](time::Error::IndeterminateOffset) if unable to determine the
/// current time zone.
#[inline]
pub fn get_local_offset() -> time::Result<UtcOffset> {
    Ok(UtcOffset::local_offset_at(OffsetDateTime::UNIX_EPOCH)?)
}
