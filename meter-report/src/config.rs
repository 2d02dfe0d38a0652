use std::{fs, path::PathBuf, time::Duration};

use anyhow::{anyhow, Context};
use meter_analytics::domain::Meter;
use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Csv,
    Ndjson,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub path: PathBuf,
    /// Inferred from the file extension when omitted.
    pub kind: Option<SourceKind>,
}

impl SourceConfig {
    pub fn resolved_kind(&self) -> anyhow::Result<SourceKind> {
        if let Some(kind) = self.kind {
            return Ok(kind);
        }
        match self.path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Ok(SourceKind::Csv),
            Some("ndjson") | Some("jsonl") => Ok(SourceKind::Ndjson),
            _ => Err(anyhow!(
                "cannot infer source kind for {}; set source.kind",
                self.path.display()
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeterConfig {
    pub name: String,
    pub meter_number: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl From<&MeterConfig> for Meter {
    fn from(m: &MeterConfig) -> Self {
        Meter::new(
            m.name.clone(),
            m.meter_number.clone(),
            m.created_at.unwrap_or(OffsetDateTime::UNIX_EPOCH),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    /// Meters to report on. Empty means every meter found in the readings.
    #[serde(default)]
    pub meters: Vec<MeterConfig>,
    #[serde(default)]
    pub output: OutputFormat,
    /// Re-read the readings on this delay instead of exiting after one report.
    pub refresh_interval_secs: Option<u64>,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("METER_REPORT_CONFIG").unwrap_or_else(|_| "meter-report.toml".to_string());
        let contents =
            fs::read_to_string(&path).with_context(|| format!("failed to read config {path}"))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }

    pub fn meters(&self) -> Vec<Meter> {
        self.meters.iter().map(Meter::from).collect()
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
