//! Shared builders for unit tests.

use time::OffsetDateTime;

use crate::domain::Reading;

pub(crate) fn series(meter_id: &str, points: &[(f64, OffsetDateTime)]) -> (String, Vec<Reading>) {
    let readings = points
        .iter()
        .map(|(value, date)| Reading::new(meter_id, *value, *date))
        .collect();
    (meter_id.to_string(), readings)
}

pub(crate) fn readings(meter_id: &str, points: &[(f64, OffsetDateTime)]) -> Vec<Reading> {
    series(meter_id, points).1
}
