//! Statistics for comparing several meters side by side.
//!
//! Unlike the interval-based functions, these sum every adjacent delta of a
//! meter with no admission filter: a counter reset lowers the meter's total
//! instead of being skipped.

use time::OffsetDateTime;

use crate::domain::{display_name, Meter};

use super::{
    legacy::{recent_window, DAYS_PER_MONTH},
    raw_delta_sum, sorted_by_date, span_days, MeterReadings,
};

/// One meter's share of the combined consumption.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConsumptionShare {
    pub name: String,
    pub percentage: f64,
}

/// Sum of all adjacent deltas of every meter.
pub fn total_consumption(meter_readings: &MeterReadings) -> f64 {
    meter_readings
        .values()
        .map(|readings| raw_delta_sum(&sorted_by_date(readings)))
        .sum()
}

/// Pooled kWh/day: summed consumption over summed day spans.
///
/// Only meters with at least two readings and a positive span take part.
pub fn average_daily_consumption(meter_readings: &MeterReadings) -> Option<f64> {
    let mut total_consumption = 0.0;
    let mut total_days = 0.0;

    for readings in meter_readings.values() {
        let sorted = sorted_by_date(readings);
        if sorted.len() < 2 {
            continue;
        }

        let days = span_days(&sorted).unwrap_or(0.0);
        if days > 0.0 {
            total_consumption += raw_delta_sum(&sorted);
            total_days += days;
        }
    }

    if total_days > 0.0 {
        Some(total_consumption / total_days)
    } else {
        None
    }
}

/// Display name of the meter with the largest delta sum.
///
/// A meter has to consume more than zero to qualify. Ties go to the first
/// meter in meter-number order. `None` if no meter qualifies or the winner is
/// missing from `meters`.
pub fn highest_consuming_meter<'a>(
    meter_readings: &MeterReadings,
    meters: &'a [Meter],
) -> Option<&'a str> {
    let mut max_consumption = 0.0;
    let mut max_meter_id: Option<&str> = None;

    for (meter_id, readings) in meter_readings {
        let sorted = sorted_by_date(readings);
        if sorted.len() < 2 {
            continue;
        }

        let consumption = raw_delta_sum(&sorted);
        if consumption > max_consumption {
            max_consumption = consumption;
            max_meter_id = Some(meter_id.as_str());
        }
    }

    display_name(meters, max_meter_id?)
}

/// Combined consumption expected over the next 30 days.
///
/// Each meter contributes its recent-window rate when the window holds two
/// readings, else its all-data rate. Meters whose chosen span is not positive
/// are left out.
pub fn combined_monthly_prediction(meter_readings: &MeterReadings, now: OffsetDateTime) -> f64 {
    let mut total = 0.0;

    for readings in meter_readings.values() {
        let sorted = sorted_by_date(readings);
        if sorted.len() < 2 {
            continue;
        }

        let recent = recent_window(&sorted, now);
        let basis = if recent.len() >= 2 { &recent } else { &sorted };

        let days = span_days(basis).unwrap_or(0.0);
        if days <= 0.0 {
            continue;
        }

        total += raw_delta_sum(basis) / days * DAYS_PER_MONTH;
    }

    total
}

/// Each named meter's share of the combined delta sum, largest first.
///
/// Meters missing from `meters` still count towards the total but are not
/// listed. Empty when the total is exactly zero.
pub fn consumption_percentages(
    meter_readings: &MeterReadings,
    meters: &[Meter],
) -> Vec<ConsumptionShare> {
    let mut consumptions: Vec<(&str, f64)> = Vec::new();
    let mut total_consumption = 0.0;

    for (meter_id, readings) in meter_readings {
        let sorted = sorted_by_date(readings);
        if sorted.len() < 2 {
            continue;
        }

        let consumption = raw_delta_sum(&sorted);
        consumptions.push((meter_id.as_str(), consumption));
        total_consumption += consumption;
    }

    if total_consumption == 0.0 {
        return Vec::new();
    }

    let mut shares: Vec<ConsumptionShare> = consumptions
        .into_iter()
        .filter_map(|(meter_id, consumption)| {
            display_name(meters, meter_id).map(|name| ConsumptionShare {
                name: name.to_string(),
                percentage: consumption / total_consumption * 100.0,
            })
        })
        .collect();

    shares.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    shares
}
