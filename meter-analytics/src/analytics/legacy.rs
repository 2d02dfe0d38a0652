//! Single-meter statistics shown on a meter's detail screen.
//!
//! These work on one reading series and compare the oldest reading with the
//! newest one (or the window's oldest with its newest) instead of summing
//! admitted intervals. Two year-end figures live here and answer different
//! questions:
//!
//! - [`predicted_year_end_reading`]: the absolute counter value expected on
//!   December 31st.
//! - [`projected_annual_consumption`]: kWh expected to be consumed over a
//!   full year.

use time::{macros::time, Date, Duration, Month, OffsetDateTime, PrimitiveDateTime};

use crate::domain::{hours_between, Reading};

use super::{sorted_by_date, span_days, HOURS_PER_YEAR, SECONDS_PER_DAY};

/// Length of the trailing window preferred for short-term rates.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Days in the "next month" projection.
pub const DAYS_PER_MONTH: f64 = 30.0;

const MIN_SPAN_HOURS: f64 = 1e-6;

/// Average kWh/day between the oldest and the newest reading.
///
/// `None` with fewer than two readings or a non-positive span. A counter that
/// went backwards overall yields a negative figure.
pub fn average_daily_consumption(readings: &[Reading]) -> Option<f64> {
    let sorted = sorted_by_date(readings);
    if sorted.len() < 2 {
        return None;
    }
    endpoint_daily_rate(&sorted)
}

/// Expected counter value at Dec 31 23:59 of `now`'s year.
///
/// Prefers the rate over the last 30 days when at least two readings fall
/// inside the window, otherwise the rate over all readings. The remaining
/// days are measured from `now` in `now`'s offset and never go negative.
pub fn predicted_year_end_reading(readings: &[Reading], now: OffsetDateTime) -> Option<f64> {
    let sorted = sorted_by_date(readings);
    let latest = sorted.last()?;

    let avg_daily = recent_or_overall_daily_rate(&sorted, now)?;
    let days_remaining = (end_of_year(now)? - now).as_seconds_f64().max(0.0) / SECONDS_PER_DAY;

    Some(latest.value + avg_daily * days_remaining)
}

/// Annual consumption implied by the oldest and newest reading.
///
/// Ignores any recent window and scales the kWh/h rate by 8760.
pub fn projected_annual_consumption(readings: &[Reading]) -> Option<f64> {
    let sorted = sorted_by_date(readings);
    let (oldest, youngest) = match sorted.as_slice() {
        [oldest, .., youngest] => (*oldest, *youngest),
        _ => return None,
    };

    let hours = hours_between(oldest.date, youngest.date).max(0.0);
    if hours <= MIN_SPAN_HOURS {
        return None;
    }

    let delta = youngest.value - oldest.value;
    if delta.is_nan() || delta < 0.0 {
        return None;
    }

    Some(delta / hours * HOURS_PER_YEAR)
}

/// Consumption expected over the next 30 days.
pub fn monthly_prediction(readings: &[Reading], now: OffsetDateTime) -> Option<f64> {
    let sorted = sorted_by_date(readings);
    if sorted.len() < 2 {
        return None;
    }
    recent_or_overall_daily_rate(&sorted, now).map(|rate| rate * DAYS_PER_MONTH)
}

/// Readings dated on or after `now - 30 days`, keeping sort order.
pub(crate) fn recent_window<'a>(sorted: &[&'a Reading], now: OffsetDateTime) -> Vec<&'a Reading> {
    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    sorted.iter().copied().filter(|r| r.date >= cutoff).collect()
}

/// Daily rate from the recent window if it has two readings, else from the
/// whole series. A degenerate window does not fall back.
fn recent_or_overall_daily_rate(sorted: &[&Reading], now: OffsetDateTime) -> Option<f64> {
    let recent = recent_window(sorted, now);
    if recent.len() >= 2 {
        endpoint_daily_rate(&recent)
    } else if sorted.len() >= 2 {
        endpoint_daily_rate(sorted)
    } else {
        None
    }
}

fn endpoint_daily_rate(sorted: &[&Reading]) -> Option<f64> {
    let first = sorted.first()?;
    let last = sorted.last()?;
    let days = span_days(sorted)?;
    if days <= 0.0 {
        return None;
    }
    Some((last.value - first.value) / days)
}

fn end_of_year(now: OffsetDateTime) -> Option<OffsetDateTime> {
    let date = Date::from_calendar_date(now.year(), Month::December, 31).ok()?;
    Some(PrimitiveDateTime::new(date, time!(23:59)).assume_offset(now.offset()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::readings;
    use crate::format;
    use time::macros::datetime;

    #[test]
    fn average_daily_uses_endpoints_only() {
        let series = readings(
            "A",
            &[
                (130.0, datetime!(2024-01-06 00:00:00 UTC)),
                (100.0, datetime!(2024-01-01 00:00:00 UTC)),
                (150.0, datetime!(2024-01-11 00:00:00 UTC)),
            ],
        );
        assert_eq!(average_daily_consumption(&series), Some(5.0));
        assert_eq!(format::one_decimal(average_daily_consumption(&series)), "5.0");
    }

    #[test]
    fn average_daily_needs_a_positive_span() {
        let at = datetime!(2024-01-01 00:00:00 UTC);
        assert_eq!(average_daily_consumption(&readings("A", &[(1.0, at)])), None);
        assert_eq!(
            average_daily_consumption(&readings("A", &[(1.0, at), (2.0, at)])),
            None
        );
    }

    #[test]
    fn year_end_prefers_recent_window() {
        let now = datetime!(2024-12-01 23:59:00 UTC);
        let series = readings(
            "A",
            &[
                (0.0, datetime!(2024-01-01 00:00:00 UTC)),
                (1000.0, datetime!(2024-11-11 23:59:00 UTC)),
                (1100.0, datetime!(2024-11-21 23:59:00 UTC)),
            ],
        );

        // 100 kWh over 10 days in the window, 30 days left in the year.
        let predicted = predicted_year_end_reading(&series, now).unwrap();
        assert!((predicted - 1400.0).abs() < 1e-9);
        assert_eq!(format::whole(Some(predicted)), "1400");
    }

    #[test]
    fn year_end_falls_back_to_all_data() {
        let now = datetime!(2024-12-01 23:59:00 UTC);
        let series = readings(
            "A",
            &[
                (0.0, datetime!(2024-09-22 23:59:00 UTC)),
                (200.0, datetime!(2024-10-12 23:59:00 UTC)),
                (300.0, datetime!(2024-11-21 23:59:00 UTC)),
            ],
        );

        // Only one reading in the window: 300 kWh over 60 days overall.
        let predicted = predicted_year_end_reading(&series, now).unwrap();
        assert!((predicted - 450.0).abs() < 1e-9);
    }

    #[test]
    fn year_end_window_includes_cutoff_instant() {
        let now = datetime!(2024-12-01 23:59:00 UTC);
        let series = readings(
            "A",
            &[
                (0.0, datetime!(2024-01-01 00:00:00 UTC)),
                (1000.0, datetime!(2024-11-01 23:59:00 UTC)),
                (1100.0, datetime!(2024-11-21 23:59:00 UTC)),
            ],
        );

        // The reading exactly 30 days back opens the window: 5 kWh/day.
        let predicted = predicted_year_end_reading(&series, now).unwrap();
        assert!((predicted - 1250.0).abs() < 1e-9);
    }

    #[test]
    fn year_end_with_degenerate_window_is_no_data() {
        let now = datetime!(2024-12-01 00:00:00 UTC);
        let at = datetime!(2024-11-25 00:00:00 UTC);
        let series = readings(
            "A",
            &[(0.0, datetime!(2024-01-01 00:00:00 UTC)), (10.0, at), (11.0, at)],
        );
        assert_eq!(predicted_year_end_reading(&series, now), None);
    }

    #[test]
    fn year_end_after_deadline_adds_nothing() {
        let now = datetime!(2024-12-31 23:59:30 UTC);
        let series = readings(
            "A",
            &[
                (10.0, datetime!(2024-12-30 00:00:00 UTC)),
                (20.0, datetime!(2024-12-31 00:00:00 UTC)),
            ],
        );
        assert_eq!(predicted_year_end_reading(&series, now), Some(20.0));
    }

    #[test]
    fn year_end_with_single_reading_is_no_data() {
        let now = datetime!(2024-06-01 00:00:00 UTC);
        let series = readings("A", &[(10.0, datetime!(2024-05-30 00:00:00 UTC))]);
        assert_eq!(predicted_year_end_reading(&series, now), None);
        assert_eq!(predicted_year_end_reading(&[], now), None);
    }

    #[test]
    fn annual_projection_scales_hourly_rate() {
        let series = readings(
            "A",
            &[
                (100.0, datetime!(2024-01-01 00:00:00 UTC)),
                (340.0, datetime!(2024-01-11 00:00:00 UTC)),
            ],
        );
        assert_eq!(projected_annual_consumption(&series), Some(8760.0));
    }

    #[test]
    fn annual_projection_rejects_backwards_counter() {
        let series = readings(
            "A",
            &[
                (500.0, datetime!(2024-01-01 00:00:00 UTC)),
                (480.0, datetime!(2024-01-11 00:00:00 UTC)),
            ],
        );
        assert_eq!(projected_annual_consumption(&series), None);

        let series = readings(
            "A",
            &[
                (500.0, datetime!(2024-01-01 00:00:00 UTC)),
                (f64::NAN, datetime!(2024-01-11 00:00:00 UTC)),
            ],
        );
        assert_eq!(projected_annual_consumption(&series), None);
    }

    #[test]
    fn monthly_prediction_uses_window_rate() {
        let now = datetime!(2024-06-30 00:00:00 UTC);
        let series = readings(
            "A",
            &[
                (0.0, datetime!(2024-01-01 00:00:00 UTC)),
                (500.0, datetime!(2024-06-10 00:00:00 UTC)),
                (550.0, datetime!(2024-06-20 00:00:00 UTC)),
            ],
        );
        assert_eq!(monthly_prediction(&series, now), Some(150.0));
        assert_eq!(format::whole(monthly_prediction(&series, now)), "150");
    }

    #[test]
    fn monthly_prediction_needs_two_readings() {
        let now = datetime!(2024-06-30 00:00:00 UTC);
        let series = readings("A", &[(1.0, datetime!(2024-06-20 00:00:00 UTC))]);
        assert_eq!(monthly_prediction(&series, now), None);
    }
}
