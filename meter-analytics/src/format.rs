//! Display formatting for engine results.
//!
//! Presentation code consumes pre-formatted strings. A missing figure renders
//! as [`NO_DATA`], which never collides with a formatted zero.

use std::fmt;

/// Placeholder glyph for "not enough data".
pub const NO_DATA: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// One decimal place, for daily-scale figures and percentages.
    OneDecimal,
    /// No decimal places, for yearly, monthly and absolute figures.
    Whole,
}

impl Precision {
    fn places(self) -> usize {
        match self {
            Precision::OneDecimal => 1,
            Precision::Whole => 0,
        }
    }
}

/// A possibly missing number together with how to print it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure {
    pub value: Option<f64>,
    pub precision: Precision,
}

impl Figure {
    pub fn one_decimal(value: Option<f64>) -> Self {
        Self { value, precision: Precision::OneDecimal }
    }

    pub fn whole(value: Option<f64>) -> Self {
        Self { value, precision: Precision::Whole }
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            // Rounds the exact binary value, ties to even, like printf.
            Some(v) => write!(f, "{:.*}", self.precision.places(), v),
            None => f.write_str(NO_DATA),
        }
    }
}

pub fn one_decimal(value: Option<f64>) -> String {
    Figure::one_decimal(value).to_string()
}

pub fn whole(value: Option<f64>) -> String {
    Figure::whole(value).to_string()
}
