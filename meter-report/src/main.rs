use anyhow::Result;
use meter_report::{
    config::{AppConfig, OutputFormat},
    loader, metrics_server, observability, report,
};
use std::env;
use time::OffsetDateTime;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let mut cfg = AppConfig::load()?;
    if let Some(path) = env::args().nth(1) {
        cfg.source.path = path.into();
    }

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let meters = cfg.meters();
    let refresh = cfg.refresh_interval();

    loop {
        match loader::load_snapshot(&cfg).await {
            Ok(snapshot) => {
                let report = report::build(&snapshot, &meters, OffsetDateTime::now_utc());
                if cfg.metrics.is_some() {
                    metrics_server::publish_projections(&snapshot);
                }

                match cfg.output {
                    OutputFormat::Text => println!("{}", report::render_text(&report)),
                    OutputFormat::Json => println!("{}", report::render_json(&report)?),
                }
            }
            // In watch mode a failed reload keeps the service alive until the next tick.
            Err(e) if refresh.is_some() => {
                tracing::error!(error = %e, "failed to load readings");
            }
            Err(e) => return Err(e),
        }

        match refresh {
            Some(delay) => tokio::time::sleep(delay).await,
            None => break,
        }
    }

    Ok(())
}
