use crate::domain::model::ProbeGranularity;
use chrono::{DateTime, Days, Utc};

/// Calendar days covered by one aggregation run, today included.
pub const WINDOW_DAYS: u64 = 14;

// The daily probe's time-of-day is an arbitrary reference point; the
// day-granularity vendors return the whole day regardless.
const DAILY_REFERENCE_HOUR: u32 = 12;

// Two-hourly grid bounds for the single-instant vendor. Booking granularity
// there is an hour or more, so a 2-hour grid still detects every slot at
// half the call volume of an hourly one.
const FINE_START_HOUR: u32 = 7;
const FINE_END_HOUR: u32 = 21;
const FINE_STEP_HOURS: usize = 2;

/// Ordered probe instants covering the next `WINDOW_DAYS` calendar days.
pub fn probe_instants(now: DateTime<Utc>, granularity: ProbeGranularity) -> Vec<DateTime<Utc>> {
    let mut probes = Vec::new();
    for day in 0..WINDOW_DAYS {
        let Some(date) = now.date_naive().checked_add_days(Days::new(day)) else {
            continue;
        };
        match granularity {
            ProbeGranularity::Daily => {
                if let Some(instant) = date.and_hms_opt(DAILY_REFERENCE_HOUR, 0, 0) {
                    probes.push(instant.and_utc());
                }
            }
            ProbeGranularity::TwoHourly => {
                for hour in (FINE_START_HOUR..=FINE_END_HOUR).step_by(FINE_STEP_HOURS) {
                    if let Some(instant) = date.and_hms_opt(hour, 0, 0) {
                        probes.push(instant.and_utc());
                    }
                }
            }
        }
    }
    probes
}
