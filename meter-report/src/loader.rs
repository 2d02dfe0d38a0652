use std::sync::Arc;

use meter_analytics::{domain::Reading, MeterReadings};

use crate::{
    config::{AppConfig, SourceKind},
    pipeline::{EnvelopeStream, Pipeline, Source},
    sinks::SnapshotSink,
    sources::{ReadingsCsvFileSource, ReadingsNdjsonFileSource},
    transform,
};

pub enum ReadingsSource {
    Csv(ReadingsCsvFileSource),
    Ndjson(ReadingsNdjsonFileSource),
}

impl ReadingsSource {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let path = &cfg.source.path;
        Ok(match cfg.source.resolved_kind()? {
            SourceKind::Csv => Self::Csv(ReadingsCsvFileSource::new(path)),
            SourceKind::Ndjson => Self::Ndjson(ReadingsNdjsonFileSource::new(path)),
        })
    }
}

#[async_trait::async_trait]
impl Source<Reading> for ReadingsSource {
    async fn stream(&self) -> EnvelopeStream<Reading> {
        match self {
            Self::Csv(s) => s.stream().await,
            Self::Ndjson(s) => s.stream().await,
        }
    }
}

/// Run source -> validation -> snapshot once and return the snapshot.
///
/// With meters configured, readings of other meters are dropped.
pub async fn load_snapshot(cfg: &AppConfig) -> anyhow::Result<MeterReadings> {
    let source = ReadingsSource::from_config(cfg)?;

    let sink = if cfg.meters.is_empty() {
        SnapshotSink::new()
    } else {
        SnapshotSink::new().with_meters(cfg.meters.iter().map(|m| m.meter_number.clone()))
    };

    let pipeline: Pipeline<_, Reading, _> = Pipeline {
        source,
        transforms: vec![Arc::new(transform::ReadingValidation)],
        sink,
    };

    let snapshot = pipeline.run().await?;
    Ok(snapshot)
}
