use std::collections::BTreeSet;

use futures::StreamExt;
use meter_analytics::{domain::Reading, MeterReadings};

use crate::pipeline::{Envelope, PipelineError, Sink};

/// Collects accepted readings into a per-meter snapshot.
///
/// Record-level errors (bad rows, failed validation) are logged and skipped.
/// A source-level error aborts the run so that a missing file never looks
/// like an empty history.
#[derive(Debug, Default)]
pub struct SnapshotSink {
    selected: Option<BTreeSet<String>>,
}

impl SnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only readings of the given meter numbers.
    pub fn with_meters<I, S>(mut self, meter_numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = Some(meter_numbers.into_iter().map(Into::into).collect());
        self
    }

    fn accepts(&self, reading: &Reading) -> bool {
        self.selected
            .as_ref()
            .map_or(true, |selected| selected.contains(&reading.meter_id))
    }
}

#[async_trait::async_trait]
impl Sink<Reading> for SnapshotSink {
    type Output = MeterReadings;

    async fn run<S>(&self, mut input: S) -> Result<MeterReadings, PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<Reading>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut snapshot = MeterReadings::new();
        let mut accepted: usize = 0;
        let mut rejected: usize = 0;
        let mut unselected: usize = 0;

        while let Some(item) = input.next().await {
            let env = match item {
                Ok(env) => env,
                Err(e) if e.is_record_level() => {
                    tracing::debug!(error = %e, "dropping reading");
                    rejected += 1;
                    continue;
                }
                Err(e) => {
                    tracing::error!(error = %e, "reading source failed");
                    return Err(e);
                }
            };

            if !self.accepts(&env.payload) {
                unselected += 1;
                continue;
            }

            snapshot
                .entry(env.payload.meter_id.clone())
                .or_default()
                .push(env.payload);
            accepted += 1;
        }

        metrics::counter!("snapshot_readings_accepted_total").increment(accepted as u64);
        metrics::counter!("snapshot_readings_rejected_total").increment(rejected as u64);
        tracing::info!(
            meters = snapshot.len(),
            accepted,
            rejected,
            unselected,
            "reading snapshot loaded"
        );

        Ok(snapshot)
    }
}
