use std::{fs::File, path::PathBuf};

use csv::StringRecord;
use meter_analytics::domain::Reading;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::{parse_kwh, parse_optional_string};
use crate::pipeline::{Envelope, EnvelopeStream, PipelineError, Source};

/// CSV source for `Reading`s.
///
/// Expected header columns (by name):
/// - meterId
/// - value (kWh, `.` or `,` as decimal separator)
/// - date (RFC3339 timestamp)
/// - imageUrl (optional)
/// - id (optional)
///
/// A malformed row is reported as a record error and the rest of the file is
/// still read.
pub struct ReadingsCsvFileSource {
    path: PathBuf,
}

impl ReadingsCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

fn record_to_reading(record: &StringRecord, headers: &StringRecord) -> Result<Reading, PipelineError> {
    let get = |name: &str| -> Result<&str, PipelineError> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .and_then(|idx| record.get(idx))
            .ok_or_else(|| PipelineError::Record(format!("missing column '{name}' in CSV record")))
    };

    let meter_id = get("meterId")?.trim().to_string();
    let value = parse_kwh(get("value")?)?;

    let date_str = get("date")?;
    let date = OffsetDateTime::parse(date_str.trim(), &Rfc3339)
        .map_err(|e| PipelineError::Record(format!("invalid date '{date_str}': {e}")))?;

    Ok(Reading {
        id: get("id").ok().and_then(parse_optional_string),
        meter_id,
        value,
        date,
        image_url: get("imageUrl").ok().and_then(parse_optional_string),
    })
}

#[async_trait::async_trait]
impl Source<Reading> for ReadingsCsvFileSource {
    async fn stream(&self) -> EnvelopeStream<Reading> {
        // Blocking CSV reader inside a single async task; reading files are small.
        let path = self.path.clone();
        let s = async_stream::stream! {
            let file = match File::open(&path) {
                Ok(f) => f,
                Err(e) => {
                    yield Err(PipelineError::Source(format!(
                        "failed to open CSV file {}: {e}",
                        path.display()
                    )));
                    return;
                }
            };
            let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
            let headers = match rdr.headers() {
                Ok(h) => h.clone(),
                Err(e) => {
                    yield Err(PipelineError::Source(format!("failed to read CSV headers: {e}")));
                    return;
                }
            };

            for (line, result) in rdr.records().enumerate() {
                let parsed = result
                    .map_err(|e| PipelineError::Record(format!("failed to read CSV record: {e}")))
                    .and_then(|record| record_to_reading(&record, &headers));

                match parsed {
                    Ok(reading) => yield Ok(Envelope::now(reading)),
                    Err(e) => {
                        metrics::counter!("readings_csv_parse_errors_total").increment(1);
                        tracing::warn!(error = %e, row = line + 1, "skipping CSV row");
                        yield Err(e);
                    }
                }
            }
        };

        Box::pin(s)
    }
}
