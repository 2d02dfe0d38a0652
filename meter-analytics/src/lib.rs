//! Consumption analytics for utility meter readings.
//!
//! [`domain`] holds readings, meters and derived intervals; [`analytics`]
//! turns reading snapshots into rates and projections; [`format`] renders
//! results the way the dashboard shows them.

pub mod analytics;
pub mod domain;
pub mod format;

#[cfg(test)]
mod fixtures;

pub use analytics::MeterReadings;
