use crate::domain::IntervalConsumption;

use super::{admitted_intervals, sorted_by_date, MeterReadings};

/// Every admitted interval of every meter, ascending by start date.
///
/// Used for time-series charts. Meters with fewer than two readings add
/// nothing.
pub fn hourly_consumption_per_interval(meter_readings: &MeterReadings) -> Vec<IntervalConsumption> {
    let mut results: Vec<IntervalConsumption> = Vec::new();

    for (meter_id, readings) in meter_readings {
        let sorted = sorted_by_date(readings);
        results.extend(admitted_intervals(meter_id, &sorted));
    }

    results.sort_by_key(|i| i.start_date);
    results
}

/// The interval between the latest two readings of each meter.
///
/// At most one entry per meter, ascending by end date. If the latest pair is
/// rejected by the admission policy the meter is left out; earlier pairs are
/// not consulted.
pub fn last_interval_per_meter(meter_readings: &MeterReadings) -> Vec<IntervalConsumption> {
    let mut results: Vec<IntervalConsumption> = meter_readings
        .iter()
        .filter_map(|(meter_id, readings)| {
            let sorted = sorted_by_date(readings);
            match sorted.as_slice() {
                [.., start, end] => IntervalConsumption::admit(meter_id, start, end),
                _ => None,
            }
        })
        .collect();

    results.sort_by_key(|i| i.end_date);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::series;
    use time::macros::datetime;

    #[test]
    fn sorts_unordered_input_before_pairing() {
        let readings = MeterReadings::from([series(
            "A",
            &[
                (340.0, datetime!(2024-01-11 00:00:00 UTC)),
                (100.0, datetime!(2024-01-01 00:00:00 UTC)),
                (220.0, datetime!(2024-01-06 00:00:00 UTC)),
            ],
        )]);

        let intervals = hourly_consumption_per_interval(&readings);
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].start_date, datetime!(2024-01-01 00:00:00 UTC));
        assert_eq!(intervals[0].consumption_kwh, 120.0);
        assert_eq!(intervals[1].consumption_kwh, 120.0);
        assert_eq!(intervals[1].kwh_per_hour, 1.0);
    }

    #[test]
    fn drops_reset_but_keeps_the_rest_of_the_series() {
        let readings = MeterReadings::from([series(
            "A",
            &[
                (100.0, datetime!(2024-01-01 00:00:00 UTC)),
                (148.0, datetime!(2024-01-03 00:00:00 UTC)),
                (10.0, datetime!(2024-01-04 00:00:00 UTC)),
                (34.0, datetime!(2024-01-05 00:00:00 UTC)),
            ],
        )]);

        let intervals = hourly_consumption_per_interval(&readings);
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].consumption_kwh, 48.0);
        assert_eq!(intervals[1].consumption_kwh, 24.0);
        assert!(intervals.iter().all(|i| i.kwh_per_hour >= 0.0));
    }

    #[test]
    fn nan_reading_does_not_poison_aggregates() {
        let readings = MeterReadings::from([series(
            "A",
            &[
                (100.0, datetime!(2024-01-01 00:00:00 UTC)),
                (340.0, datetime!(2024-01-11 00:00:00 UTC)),
                (f64::NAN, datetime!(2024-01-12 00:00:00 UTC)),
            ],
        )]);

        let intervals = hourly_consumption_per_interval(&readings);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].consumption_kwh, 240.0);

        assert_eq!(crate::analytics::average_hourly_consumption_all_data(&readings), Some(1.0));
        assert_eq!(crate::analytics::total_consumption_kwh(&readings), 240.0);
        assert_eq!(crate::analytics::projected_daily_consumption_all_data(&readings), Some(24.0));
    }

    #[test]
    fn merges_meters_by_start_date() {
        let readings = MeterReadings::from([
            series(
                "A",
                &[
                    (0.0, datetime!(2024-02-01 00:00:00 UTC)),
                    (10.0, datetime!(2024-02-02 00:00:00 UTC)),
                ],
            ),
            series(
                "B",
                &[
                    (0.0, datetime!(2024-01-01 00:00:00 UTC)),
                    (10.0, datetime!(2024-01-02 00:00:00 UTC)),
                ],
            ),
            series("C", &[(5.0, datetime!(2024-01-01 00:00:00 UTC))]),
        ]);

        let intervals = hourly_consumption_per_interval(&readings);
        let ids: Vec<&str> = intervals.iter().map(|i| i.meter_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn duplicate_timestamps_are_skipped() {
        let at = datetime!(2024-01-01 00:00:00 UTC);
        let readings = MeterReadings::from([series(
            "A",
            &[(1.0, at), (2.0, at), (26.0, datetime!(2024-01-02 00:00:00 UTC))],
        )]);

        let intervals = hourly_consumption_per_interval(&readings);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].consumption_kwh, 24.0);
    }

    #[test]
    fn empty_snapshot_yields_nothing() {
        assert!(hourly_consumption_per_interval(&MeterReadings::new()).is_empty());
        assert!(last_interval_per_meter(&MeterReadings::new()).is_empty());
    }

    #[test]
    fn last_interval_uses_only_latest_pair() {
        let readings = MeterReadings::from([
            series(
                "A",
                &[
                    (0.0, datetime!(2024-01-01 00:00:00 UTC)),
                    (240.0, datetime!(2024-01-02 00:00:00 UTC)),
                    (264.0, datetime!(2024-01-03 00:00:00 UTC)),
                ],
            ),
            series(
                "B",
                &[
                    (0.0, datetime!(2024-01-01 00:00:00 UTC)),
                    (48.0, datetime!(2024-01-02 12:00:00 UTC)),
                ],
            ),
        ]);

        let intervals = last_interval_per_meter(&readings);
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].meter_id, "B");
        assert_eq!(intervals[1].meter_id, "A");
        assert_eq!(intervals[1].kwh_per_hour, 1.0);
    }

    #[test]
    fn last_interval_omits_meter_with_rejected_latest_pair() {
        let readings = MeterReadings::from([series(
            "B",
            &[
                (400.0, datetime!(2024-01-01 00:00:00 UTC)),
                (500.0, datetime!(2024-01-02 00:00:00 UTC)),
                (480.0, datetime!(2024-01-03 00:00:00 UTC)),
            ],
        )]);

        assert!(last_interval_per_meter(&readings).is_empty());
    }
}
