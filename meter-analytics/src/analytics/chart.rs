//! Series for the consumption-rate step chart of a single meter.

use time::OffsetDateTime;

use crate::domain::{hours_between, IntervalConsumption, Reading};

use super::{sorted_by_date, HOURS_PER_DAY};

/// One vertex of the step chart, in kWh/day.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StepPoint {
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub at: OffsetDateTime,
    pub kwh_per_day: f64,
}

/// Horizontal reference line for the overall average rate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AverageLine {
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub start: OffsetDateTime,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub end: OffsetDateTime,
    pub kwh_per_day: f64,
}

/// Admitted intervals of one series in chronological order.
///
/// Each interval carries the meter id of its starting reading.
pub fn series_intervals(readings: &[Reading]) -> Vec<IntervalConsumption> {
    let sorted = sorted_by_date(readings);
    sorted
        .windows(2)
        .filter_map(|pair| IntervalConsumption::admit(&pair[0].meter_id, pair[0], pair[1]))
        .collect()
}

/// Two points per interval, at its start and end, both at the interval's rate.
pub fn step_points(readings: &[Reading]) -> Vec<StepPoint> {
    series_intervals(readings)
        .iter()
        .flat_map(|interval| {
            let kwh_per_day = interval.kwh_per_day();
            [
                StepPoint { at: interval.start_date, kwh_per_day },
                StepPoint { at: interval.end_date, kwh_per_day },
            ]
        })
        .collect()
}

/// Oldest-to-newest average rate, or `None` if the series cannot give one.
pub fn average_line(readings: &[Reading]) -> Option<AverageLine> {
    let sorted = sorted_by_date(readings);
    let (oldest, youngest) = match sorted.as_slice() {
        [oldest, .., youngest] => (*oldest, *youngest),
        _ => return None,
    };

    let hours = hours_between(oldest.date, youngest.date);
    if hours <= 0.0 {
        return None;
    }
    let delta = youngest.value - oldest.value;
    if delta.is_nan() || delta < 0.0 {
        return None;
    }

    Some(AverageLine {
        start: oldest.date,
        end: youngest.date,
        kwh_per_day: delta / hours * HOURS_PER_DAY,
    })
}

/// First interval whose closed range contains `at`.
pub fn interval_at(intervals: &[IntervalConsumption], at: OffsetDateTime) -> Option<&IntervalConsumption> {
    intervals.iter().find(|i| i.contains(at))
}

/// Tooltip value for an interval: kWh/day rounded half away from zero.
pub fn tooltip_kwh_per_day(interval: &IntervalConsumption) -> i64 {
    interval.kwh_per_day().round() as i64
}
