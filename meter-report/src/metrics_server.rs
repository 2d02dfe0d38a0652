use std::net::SocketAddr;

use anyhow::Context;
use axum::{routing::get, Router};
use meter_analytics::{analytics, MeterReadings};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder and serve `/metrics` on `bind_addr`.
pub fn init(bind_addr: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid metrics bind address '{bind_addr}'"))?;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus metrics recorder")?;

    // Ignore error if the handle was already set; this should only be called once.
    let _ = PROM_HANDLE.set(handle);

    tokio::spawn(async move {
        let app = Router::new().route("/metrics", get(metrics_handler));

        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                    tracing::error!(error = %e, "metrics server error");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to bind metrics listener");
            }
        }
    });

    Ok(())
}

async fn metrics_handler() -> String {
    PROM_HANDLE.get().map(|h| h.render()).unwrap_or_default()
}

/// Refresh projection gauges from the latest snapshot.
///
/// A projection without data is published as NaN so a stale value never
/// outlives the snapshot that produced it.
pub fn publish_projections(snapshot: &MeterReadings) {
    metrics::gauge!("meter_snapshot_meters").set(snapshot.len() as f64);
    metrics::gauge!("meter_total_consumption_kwh").set(analytics::total_consumption_kwh(snapshot));

    for (horizon, basis, value) in projection_gauges(snapshot) {
        if value.is_nan() {
            tracing::debug!(horizon, basis, "projection has no data");
        }
        metrics::gauge!(
            "meter_projected_consumption_kwh",
            "horizon" => horizon,
            "basis" => basis
        )
        .set(value);
    }
}

/// `(horizon, basis, kWh)` for every projection gauge; NaN marks no data.
pub fn projection_gauges(snapshot: &MeterReadings) -> [(&'static str, &'static str, f64); 4] {
    [
        ("daily", "all_data", analytics::projected_daily_consumption_all_data(snapshot)),
        ("yearly", "all_data", analytics::projected_yearly_consumption_all_data(snapshot)),
        ("daily", "last_interval", analytics::projected_daily_consumption_from_last_interval(snapshot)),
        ("yearly", "last_interval", analytics::projected_yearly_consumption_from_last_interval(snapshot)),
    ]
    .map(|(horizon, basis, value)| (horizon, basis, value.unwrap_or(f64::NAN)))
}
