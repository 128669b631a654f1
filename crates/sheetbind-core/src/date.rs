//! Excel serial date conversion
//!
//! Serial numbers count days from the workbook epoch; the fractional part is
//! the time of day. The 1900 system uses 1899-12-30 as day zero, which absorbs
//! the phantom 1900-02-29. The 1904 system counts from 1904-01-01.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Largest serial Excel can display (9999-12-31)
pub const MAX_SERIAL: f64 = 2_958_465.999_988_426;

/// Text form of date/times that have no serial number
pub const TEXT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const MILLIS_PER_DAY: f64 = 86_400_000.0;

fn epoch(date1904: bool) -> Option<NaiveDateTime> {
    let date = if date1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    Some(date.and_time(NaiveTime::from_hms_opt(0, 0, 0)?))
}

/// Convert a serial number to a date/time, or `None` when out of range
pub fn serial_to_datetime(serial: f64, date1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial > MAX_SERIAL {
        return None;
    }
    let days = serial.trunc() as i64;
    let millis = (serial.fract() * MILLIS_PER_DAY).round() as i64;
    epoch(date1904)?
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::milliseconds(millis))
}

/// Convert a date/time to a serial number, keeping millisecond precision
///
/// The result is not range checked; dates before the epoch give negative
/// serials that [`serial_to_datetime`] rejects.
pub fn datetime_to_serial(dt: &NaiveDateTime, date1904: bool) -> f64 {
    let Some(base) = epoch(date1904) else {
        return 0.0;
    };
    let elapsed = *dt - base;
    elapsed.num_milliseconds() as f64 / MILLIS_PER_DAY
}
