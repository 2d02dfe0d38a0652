use time::{macros::datetime, OffsetDateTime};

/// One observation of a meter's cumulative counter.
///
/// `meter_id` holds the owning meter's `meter_number`. Readings arrive in no
/// particular order and timestamps are not guaranteed to be unique.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Reading {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub id: Option<String>,
    pub meter_id: String,
    /// Cumulative kWh.
    pub value: f64,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub date: OffsetDateTime,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub image_url: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReadingError {
    #[error("meter id must not be empty")]
    EmptyMeterId,
    #[error("value must be a finite number, got {0}")]
    NonFiniteValue(f64),
    #[error("value must be non-negative, got {0}")]
    NegativeValue(f64),
    #[error("date {0} is outside the allowed range")]
    DateOutOfRange(OffsetDateTime),
}

impl Reading {
    pub fn new(meter_id: impl Into<String>, value: f64, date: OffsetDateTime) -> Self {
        Self {
            id: None,
            meter_id: meter_id.into(),
            value,
            date,
            image_url: None,
        }
    }

    /// Sanity checks applied at ingestion boundaries.
    ///
    /// Rules:
    /// - meter id must be non-empty.
    /// - value must be finite and non-negative.
    /// - date must be within [2000-01-01, 2100-01-01].
    ///
    /// The analytics functions never call this; they tolerate any input and
    /// drop intervals they cannot use.
    pub fn validate(&self) -> Result<(), ReadingError> {
        if self.meter_id.trim().is_empty() {
            return Err(ReadingError::EmptyMeterId);
        }
        if !self.value.is_finite() {
            return Err(ReadingError::NonFiniteValue(self.value));
        }
        if self.value < 0.0 {
            return Err(ReadingError::NegativeValue(self.value));
        }

        let min_ts = datetime!(2000-01-01 00:00:00 UTC);
        let max_ts = datetime!(2100-01-01 00:00:00 UTC);
        if self.date < min_ts || self.date > max_ts {
            return Err(ReadingError::DateOutOfRange(self.date));
        }

        Ok(())
    }
}
