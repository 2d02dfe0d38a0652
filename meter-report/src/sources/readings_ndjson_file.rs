use std::path::PathBuf;

use meter_analytics::domain::Reading;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
};

use crate::pipeline::{Envelope, EnvelopeStream, PipelineError, Source};

/// NDJSON source for `Reading`s.
///
/// Each non-blank line is one reading document in the store's shape:
/// `{"meterId": "...", "value": 123.4, "date": "<RFC3339>", "imageUrl": null, "id": "..."}`.
pub struct ReadingsNdjsonFileSource {
    path: PathBuf,
}

impl ReadingsNdjsonFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl Source<Reading> for ReadingsNdjsonFileSource {
    async fn stream(&self) -> EnvelopeStream<Reading> {
        let path = self.path.clone();
        let s = async_stream::stream! {
            let file = match File::open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    yield Err(PipelineError::Source(format!(
                        "failed to open readings file {}: {e}",
                        path.display()
                    )));
                    return;
                }
            };
            let mut lines = BufReader::new(file).lines();
            let mut line_no: usize = 0;

            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(PipelineError::Source(format!("failed to read readings line: {e}")));
                        return;
                    }
                };
                line_no += 1;

                if line.trim().is_empty() {
                    continue;
                }

                match serde_json::from_str::<Reading>(&line) {
                    Ok(reading) => yield Ok(Envelope::now(reading)),
                    Err(e) => {
                        metrics::counter!("readings_ndjson_parse_errors_total").increment(1);
                        tracing::warn!(error = %e, line = line_no, "skipping readings line");
                        yield Err(PipelineError::Record(format!("failed to parse readings line {line_no}: {e}")));
                    }
                }
            }
        };

        Box::pin(s)
    }
}
