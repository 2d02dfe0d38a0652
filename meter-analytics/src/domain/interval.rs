use time::OffsetDateTime;

use super::Reading;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Consumption observed between two adjacent readings of one meter.
///
/// Only built through [`IntervalConsumption::admit`], so `start_date < end_date`
/// and `consumption_kwh >= 0` always hold.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct IntervalConsumption {
    pub meter_id: String,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub start_date: OffsetDateTime,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub end_date: OffsetDateTime,
    pub consumption_kwh: f64,
    pub hours: f64,
    #[cfg_attr(feature = "serde", serde(rename = "kWhPerHour"))]
    pub kwh_per_hour: f64,
}

impl IntervalConsumption {
    /// Apply the admission policy to two adjacent readings.
    ///
    /// Returns `None` when the span is not positive, the counter went
    /// backwards, or the delta is not a number. Nothing is clamped.
    pub fn admit(meter_id: &str, start: &Reading, end: &Reading) -> Option<Self> {
        let hours = hours_between(start.date, end.date);
        if hours <= 0.0 {
            return None;
        }

        let delta = end.value - start.value;
        if delta.is_nan() || delta < 0.0 {
            return None;
        }

        Some(Self {
            meter_id: meter_id.to_string(),
            start_date: start.date,
            end_date: end.date,
            consumption_kwh: delta,
            hours,
            kwh_per_hour: delta / hours,
        })
    }

    pub fn kwh_per_day(&self) -> f64 {
        self.kwh_per_hour * 24.0
    }

    /// Whether `at` falls inside `[start_date, end_date]`.
    pub fn contains(&self, at: OffsetDateTime) -> bool {
        at >= self.start_date && at <= self.end_date
    }
}

pub(crate) fn hours_between(start: OffsetDateTime, end: OffsetDateTime) -> f64 {
    (end - start).as_seconds_f64() / SECONDS_PER_HOUR
}
