//! Consumption analytics over reading snapshots.
//!
//! Every function here is pure: it takes the full snapshot by reference,
//! sorts each series on its own copy and returns fresh values. Insufficient
//! data is reported as `None`, never as an error.

pub mod chart;
pub mod comparison;
mod intervals;
pub mod legacy;
mod rates;

use std::collections::BTreeMap;

use crate::domain::{IntervalConsumption, Reading};

pub use intervals::{hourly_consumption_per_interval, last_interval_per_meter};
pub use rates::{
    average_hourly_consumption_all_data, projected_daily_consumption_all_data,
    projected_daily_consumption_from_last_interval, projected_yearly_consumption_all_data,
    projected_yearly_consumption_from_last_interval, total_consumption_kwh,
};

/// Readings keyed by meter number.
///
/// Ordered so that iteration (and every tie-break that depends on it) is
/// lexicographic by meter number.
pub type MeterReadings = BTreeMap<String, Vec<Reading>>;

pub const HOURS_PER_DAY: f64 = 24.0;
/// Non-leap year.
pub const HOURS_PER_YEAR: f64 = 8760.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Copy of `readings` in ascending date order. Stable for equal timestamps.
pub(crate) fn sorted_by_date(readings: &[Reading]) -> Vec<&Reading> {
    let mut sorted: Vec<&Reading> = readings.iter().collect();
    sorted.sort_by_key(|r| r.date);
    sorted
}

/// Admitted intervals of one already-sorted series, in order.
pub(crate) fn admitted_intervals<'a>(
    meter_id: &'a str,
    sorted: &'a [&'a Reading],
) -> impl Iterator<Item = IntervalConsumption> + 'a {
    sorted
        .windows(2)
        .filter_map(move |pair| IntervalConsumption::admit(meter_id, pair[0], pair[1]))
}

/// Sum of every adjacent delta, with no admission filter.
///
/// Telescopes to `last - first`, but is computed pairwise so that it stays a
/// separate code path from the admitted totals.
pub(crate) fn raw_delta_sum(sorted: &[&Reading]) -> f64 {
    sorted.windows(2).map(|pair| pair[1].value - pair[0].value).sum()
}

/// Days between the first and last reading of a sorted series.
pub(crate) fn span_days(sorted: &[&Reading]) -> Option<f64> {
    let first = sorted.first()?;
    let last = sorted.last()?;
    Some((last.date - first.date).as_seconds_f64() / SECONDS_PER_DAY)
}
