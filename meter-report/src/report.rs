//! Dashboard and comparison figures for one reading snapshot.
//!
//! Every figure is pre-formatted the way the dashboard shows it; `"-"` marks
//! a figure without enough data.

use std::fmt::Write as _;

use meter_analytics::{
    analytics::{self, chart, comparison, legacy},
    domain::Meter,
    format::{self, NO_DATA},
    MeterReadings,
};
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

#[derive(Debug, Clone, Serialize)]
pub struct MeterReport {
    pub name: String,
    pub meter_number: String,
    pub readings: usize,
    /// kWh/day, oldest vs newest reading.
    pub average_daily: String,
    /// Expected counter value on Dec 31.
    pub year_end_reading: String,
    /// Expected kWh over a full year.
    pub annual_consumption: String,
    pub next_month: String,
    /// kWh/day over the latest interval.
    pub current_daily: String,
    pub chart: Vec<chart::StepPoint>,
    pub average_line: Option<chart::AverageLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub meters: usize,
    pub intervals: usize,
    pub total_consumption_kwh: String,
    pub average_hourly_kwh: String,
    pub projected_daily_all_data: String,
    pub projected_yearly_all_data: String,
    pub projected_daily_last_interval: String,
    pub projected_yearly_last_interval: String,
    /// Delta sum without the interval filter.
    pub raw_total_kwh: String,
    pub average_daily: String,
    pub next_month: String,
    pub highest_consumer: String,
    pub breakdown: Vec<comparison::ConsumptionShare>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub meters: Vec<MeterReport>,
    pub comparison: ComparisonReport,
}

/// Meters to report on: the configured ones, or one per meter number found
/// in the snapshot, named after its number.
pub fn effective_meters(meters: &[Meter], snapshot: &MeterReadings) -> Vec<Meter> {
    if !meters.is_empty() {
        return meters.to_vec();
    }
    snapshot
        .keys()
        .map(|number| Meter::new(number.clone(), number.clone(), OffsetDateTime::UNIX_EPOCH))
        .collect()
}

pub fn meter_report(meter: &Meter, snapshot: &MeterReadings, now: OffsetDateTime) -> MeterReport {
    let readings = snapshot
        .get(&meter.meter_number)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let single = MeterReadings::from([(meter.meter_number.clone(), readings.to_vec())]);

    MeterReport {
        name: meter.name.clone(),
        meter_number: meter.meter_number.clone(),
        readings: readings.len(),
        average_daily: format::one_decimal(legacy::average_daily_consumption(readings)),
        year_end_reading: format::whole(legacy::predicted_year_end_reading(readings, now)),
        annual_consumption: format::whole(legacy::projected_annual_consumption(readings)),
        next_month: format::whole(legacy::monthly_prediction(readings, now)),
        current_daily: format::one_decimal(analytics::projected_daily_consumption_from_last_interval(
            &single,
        )),
        chart: chart::step_points(readings),
        average_line: chart::average_line(readings),
    }
}

pub fn comparison_report(
    snapshot: &MeterReadings,
    meters: &[Meter],
    now: OffsetDateTime,
) -> ComparisonReport {
    ComparisonReport {
        meters: snapshot.len(),
        intervals: analytics::hourly_consumption_per_interval(snapshot).len(),
        total_consumption_kwh: format::whole(Some(analytics::total_consumption_kwh(snapshot))),
        average_hourly_kwh: format::one_decimal(analytics::average_hourly_consumption_all_data(
            snapshot,
        )),
        projected_daily_all_data: format::one_decimal(
            analytics::projected_daily_consumption_all_data(snapshot),
        ),
        projected_yearly_all_data: format::whole(analytics::projected_yearly_consumption_all_data(
            snapshot,
        )),
        projected_daily_last_interval: format::one_decimal(
            analytics::projected_daily_consumption_from_last_interval(snapshot),
        ),
        projected_yearly_last_interval: format::whole(
            analytics::projected_yearly_consumption_from_last_interval(snapshot),
        ),
        raw_total_kwh: format::whole(Some(comparison::total_consumption(snapshot))),
        average_daily: format::one_decimal(comparison::average_daily_consumption(snapshot)),
        next_month: format::whole(Some(comparison::combined_monthly_prediction(snapshot, now))),
        highest_consumer: comparison::highest_consuming_meter(snapshot, meters)
            .unwrap_or(NO_DATA)
            .to_string(),
        breakdown: comparison::consumption_percentages(snapshot, meters),
    }
}

pub fn build(snapshot: &MeterReadings, meters: &[Meter], now: OffsetDateTime) -> Report {
    let meters = effective_meters(meters, snapshot);

    Report {
        generated_at: now,
        meters: meters.iter().map(|m| meter_report(m, snapshot, now)).collect(),
        comparison: comparison_report(snapshot, &meters, now),
    }
}

/// Plain-text rendering, one labelled figure per line.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let generated = report
        .generated_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| report.generated_at.to_string());
    let _ = writeln!(out, "Report generated {generated}");

    for m in &report.meters {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} ({}) - {} readings", m.name, m.meter_number, m.readings);
        line(&mut out, "Average", &m.average_daily, "kWh/day");
        line(&mut out, "Current", &m.current_daily, "kWh/day");
        line(&mut out, "Year end reading", &m.year_end_reading, "kWh");
        line(&mut out, "Annual consumption", &m.annual_consumption, "kWh");
        line(&mut out, "Next month", &m.next_month, "kWh");
    }

    let c = &report.comparison;
    let _ = writeln!(out);
    let _ = writeln!(out, "Combined statistics - {} meters, {} intervals", c.meters, c.intervals);
    line(&mut out, "Total consumption", &c.total_consumption_kwh, "kWh");
    line(&mut out, "Daily (all data)", &c.projected_daily_all_data, "kWh/day");
    line(&mut out, "Yearly (all data)", &c.projected_yearly_all_data, "kWh");
    line(&mut out, "Daily (last interval)", &c.projected_daily_last_interval, "kWh/day");
    line(&mut out, "Yearly (last interval)", &c.projected_yearly_last_interval, "kWh");
    line(&mut out, "Avg daily", &c.average_daily, "kWh/day");
    line(&mut out, "Next month", &c.next_month, "kWh");
    line(&mut out, "Highest user", &c.highest_consumer, "");

    if !c.breakdown.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Consumption breakdown");
        for share in &c.breakdown {
            let pct = format::one_decimal(Some(share.percentage));
            let _ = writeln!(out, "  {:<24} {:>10}%", share.name, pct);
        }
    }

    out
}

fn line(out: &mut String, label: &str, value: &str, unit: &str) {
    let _ = writeln!(out, "  {label:<24} {value:>10} {unit}");
}

pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_analytics::domain::Reading;
    use time::macros::datetime;

    fn snapshot() -> MeterReadings {
        MeterReadings::from([
            (
                "A".to_string(),
                vec![
                    Reading::new("A", 340.0, datetime!(2024-01-11 00:00:00 UTC)),
                    Reading::new("A", 100.0, datetime!(2024-01-01 00:00:00 UTC)),
                ],
            ),
            (
                "B".to_string(),
                vec![
                    Reading::new("B", 500.0, datetime!(2024-01-01 00:00:00 UTC)),
                    Reading::new("B", 480.0, datetime!(2024-01-05 00:00:00 UTC)),
                ],
            ),
        ])
    }

    fn meters() -> Vec<Meter> {
        let created = datetime!(2023-01-01 00:00:00 UTC);
        vec![Meter::new("House", "A", created), Meter::new("Garage", "B", created)]
    }

    #[test]
    fn builds_meter_and_comparison_figures() {
        let now = datetime!(2024-06-01 00:00:00 UTC);
        let report = build(&snapshot(), &meters(), now);

        let house = &report.meters[0];
        assert_eq!(house.average_daily, "24.0");
        assert_eq!(house.annual_consumption, "8760");
        assert_eq!(house.current_daily, "24.0");
        assert_eq!(house.chart.len(), 2);

        let garage = &report.meters[1];
        assert_eq!(garage.annual_consumption, NO_DATA);
        assert_eq!(garage.current_daily, NO_DATA);
        assert!(garage.average_line.is_none());

        let c = &report.comparison;
        assert_eq!(c.intervals, 1);
        assert_eq!(c.total_consumption_kwh, "240");
        assert_eq!(c.raw_total_kwh, "220");
        assert_eq!(c.projected_daily_all_data, "24.0");
        assert_eq!(c.projected_yearly_all_data, "8760");
        assert_eq!(c.highest_consumer, "House");
    }

    #[test]
    fn unconfigured_meters_are_named_by_number() {
        let now = datetime!(2024-06-01 00:00:00 UTC);
        let report = build(&snapshot(), &[], now);
        let names: Vec<&str> = report.meters.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn configured_meter_without_readings_shows_sentinels() {
        let now = datetime!(2024-06-01 00:00:00 UTC);
        let meter = Meter::new("Shed", "S", now);
        let report = meter_report(&meter, &snapshot(), now);
        assert_eq!(report.readings, 0);
        assert_eq!(report.average_daily, NO_DATA);
        assert_eq!(report.year_end_reading, NO_DATA);
        assert_eq!(report.next_month, NO_DATA);
    }

    #[test]
    fn renders_text_and_json() {
        let now = datetime!(2024-06-01 00:00:00 UTC);
        let report = build(&snapshot(), &meters(), now);

        let text = render_text(&report);
        assert!(text.contains("House (A) - 2 readings"));
        assert!(text.contains("Highest user"));

        let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(json["comparison"]["projected_daily_all_data"], "24.0");
        assert_eq!(json["generated_at"], "2024-06-01T00:00:00Z");
    }
}
