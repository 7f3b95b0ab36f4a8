//! Time source types
//!
//! [`ClockSnapshot`] is an immutable read of the RTC at one instant. The
//! control loop takes a fresh one per iteration and only ever compares it
//! against cached fields. The calendar conversion is used when applying a
//! fetched NTP timestamp to the RTC; it is exact for the whole Gregorian
//! range, leap years included.

/// Seconds per civil day
const SECS_PER_DAY: i64 = 86_400;

/// One RTC reading; never mutated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSnapshot {
    pub year: u16,
    /// 1..=12
    pub month: u8,
    /// 1..=31
    pub day: u8,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ClockSnapshot {
    /// Build a snapshot from a Unix timestamp, shifted into local time
    pub fn from_unix(unix: u64, utc_offset_minutes: i32) -> Self {
        let local = unix as i64 + i64::from(utc_offset_minutes) * 60;
        let days = local.div_euclid(SECS_PER_DAY);
        let secs_of_day = local.rem_euclid(SECS_PER_DAY);

        let (year, month, day) = civil_from_days(days);
        // 1970-01-01 was a Thursday
        let weekday = (days.rem_euclid(7) + 4) % 7;

        Self {
            year: year as u16,
            month,
            day,
            weekday: weekday as u8,
            hour: (secs_of_day / 3600) as u8,
            minute: (secs_of_day % 3600 / 60) as u8,
            second: (secs_of_day % 60) as u8,
        }
    }
}

/// Days since 1970-01-01 to (year, month, day)
///
/// Howard Hinnant's civil-from-days algorithm, restated over 400-year
/// Gregorian eras.
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { year + 1 } else { year };
    (year, month as u8, day as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        let snapshot = ClockSnapshot::from_unix(0, 0);
        assert_eq!((snapshot.year, snapshot.month, snapshot.day), (1970, 1, 1));
        assert_eq!(snapshot.weekday, 4); // Thursday
        assert_eq!(
            (snapshot.hour, snapshot.minute, snapshot.second),
            (0, 0, 0)
        );
    }

    #[test]
    fn test_known_timestamp() {
        // 2024-03-09 14:35:07 UTC, a Saturday
        let snapshot = ClockSnapshot::from_unix(1_709_994_907, 0);
        assert_eq!((snapshot.year, snapshot.month, snapshot.day), (2024, 3, 9));
        assert_eq!(snapshot.weekday, 6);
        assert_eq!(
            (snapshot.hour, snapshot.minute, snapshot.second),
            (14, 35, 7)
        );
    }

    #[test]
    fn test_leap_day() {
        // 2024-02-29 00:00:00 UTC
        let snapshot = ClockSnapshot::from_unix(1_709_164_800, 0);
        assert_eq!((snapshot.year, snapshot.month, snapshot.day), (2024, 2, 29));
    }

    #[test]
    fn test_century_non_leap() {
        // 2100 is not a leap year: 2100-03-01 follows 2100-02-28
        let feb28 = ClockSnapshot::from_unix(4_107_456_000, 0);
        assert_eq!((feb28.year, feb28.month, feb28.day), (2100, 2, 28));
        let next_day = ClockSnapshot::from_unix(4_107_456_000 + 86_400, 0);
        assert_eq!((next_day.year, next_day.month, next_day.day), (2100, 3, 1));
    }

    #[test]
    fn test_utc_offset_shifts_civil_fields() {
        // 2024-03-09 23:30:00 UTC at +60 minutes is past local midnight
        let snapshot = ClockSnapshot::from_unix(1_710_027_000, 60);
        assert_eq!((snapshot.month, snapshot.day), (3, 10));
        assert_eq!((snapshot.hour, snapshot.minute), (0, 30));
    }

    #[test]
    fn test_negative_offset() {
        // 30 minutes into the epoch at -60 minutes: previous civil day
        let snapshot = ClockSnapshot::from_unix(1_800, -60);
        assert_eq!((snapshot.year, snapshot.month, snapshot.day), (1969, 12, 31));
        assert_eq!((snapshot.hour, snapshot.minute), (23, 30));
    }
}
