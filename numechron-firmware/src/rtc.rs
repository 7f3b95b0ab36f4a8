//! RTC snapshot conversions
//!
//! Maps between the RP2040 RTC's `DateTime` and the core's
//! `ClockSnapshot` (weekday 0 = Sunday in both encodings).

use embassy_rp::rtc::{DateTime, DayOfWeek};

use numechron_core::time::ClockSnapshot;

pub fn datetime_to_snapshot(dt: &DateTime) -> ClockSnapshot {
    ClockSnapshot {
        year: dt.year,
        month: dt.month,
        day: dt.day,
        weekday: day_of_week_index(dt.day_of_week),
        hour: dt.hour,
        minute: dt.minute,
        second: dt.second,
    }
}

pub fn snapshot_to_datetime(snapshot: &ClockSnapshot) -> DateTime {
    DateTime {
        year: snapshot.year,
        month: snapshot.month,
        day: snapshot.day,
        day_of_week: day_of_week_from_index(snapshot.weekday),
        hour: snapshot.hour,
        minute: snapshot.minute,
        second: snapshot.second,
    }
}

fn day_of_week_index(day: DayOfWeek) -> u8 {
    match day {
        DayOfWeek::Sunday => 0,
        DayOfWeek::Monday => 1,
        DayOfWeek::Tuesday => 2,
        DayOfWeek::Wednesday => 3,
        DayOfWeek::Thursday => 4,
        DayOfWeek::Friday => 5,
        DayOfWeek::Saturday => 6,
    }
}

fn day_of_week_from_index(index: u8) -> DayOfWeek {
    match index {
        1 => DayOfWeek::Monday,
        2 => DayOfWeek::Tuesday,
        3 => DayOfWeek::Wednesday,
        4 => DayOfWeek::Thursday,
        5 => DayOfWeek::Friday,
        6 => DayOfWeek::Saturday,
        _ => DayOfWeek::Sunday,
    }
}
