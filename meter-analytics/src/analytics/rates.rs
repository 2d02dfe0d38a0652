use super::{
    admitted_intervals, intervals::last_interval_per_meter, sorted_by_date, MeterReadings,
    HOURS_PER_DAY, HOURS_PER_YEAR,
};

/// Time-weighted average rate in kWh/h across every admitted interval.
///
/// Computed as `sum(delta) / sum(hours)`, so a long interval weighs more
/// than a short one. `None` when no interval was admitted.
pub fn average_hourly_consumption_all_data(meter_readings: &MeterReadings) -> Option<f64> {
    let mut total_kwh = 0.0;
    let mut total_hours = 0.0;

    for (meter_id, readings) in meter_readings {
        let sorted = sorted_by_date(readings);
        for interval in admitted_intervals(meter_id, &sorted) {
            total_kwh += interval.consumption_kwh;
            total_hours += interval.hours;
        }
    }

    if total_hours > 0.0 {
        Some(total_kwh / total_hours)
    } else {
        None
    }
}

/// Long-run daily projection from the all-data average.
pub fn projected_daily_consumption_all_data(meter_readings: &MeterReadings) -> Option<f64> {
    average_hourly_consumption_all_data(meter_readings).map(|rate| rate * HOURS_PER_DAY)
}

/// Long-run yearly projection from the all-data average.
pub fn projected_yearly_consumption_all_data(meter_readings: &MeterReadings) -> Option<f64> {
    average_hourly_consumption_all_data(meter_readings).map(|rate| rate * HOURS_PER_YEAR)
}

/// Combined current rate: latest-interval kWh/h summed over all meters.
fn last_interval_rate_sum(meter_readings: &MeterReadings) -> Option<f64> {
    let intervals = last_interval_per_meter(meter_readings);
    if intervals.is_empty() {
        return None;
    }
    Some(intervals.iter().map(|i| i.kwh_per_hour).sum())
}

/// Daily projection from the most recent interval of each meter.
pub fn projected_daily_consumption_from_last_interval(meter_readings: &MeterReadings) -> Option<f64> {
    last_interval_rate_sum(meter_readings).map(|rate| rate * HOURS_PER_DAY)
}

/// Yearly projection from the most recent interval of each meter.
pub fn projected_yearly_consumption_from_last_interval(meter_readings: &MeterReadings) -> Option<f64> {
    last_interval_rate_sum(meter_readings).map(|rate| rate * HOURS_PER_YEAR)
}

/// Raw kWh consumed over all admitted intervals. Time is not considered.
pub fn total_consumption_kwh(meter_readings: &MeterReadings) -> f64 {
    meter_readings
        .iter()
        .map(|(meter_id, readings)| {
            let sorted = sorted_by_date(readings);
            admitted_intervals(meter_id, &sorted)
                .map(|i| i.consumption_kwh)
                .sum::<f64>()
        })
        .sum()
}
