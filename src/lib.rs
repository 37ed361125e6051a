pub mod config;
pub mod dataset;
pub mod errors;
pub mod layout;
pub mod models;
pub mod palette;
pub mod render;

use crate::config::ChartConfig;
use crate::errors::{ChartError, ChartResult};
use crate::models::{CategoryRow, ChartLayout};
use std::io::Write;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

#[derive(Debug, Clone)]
pub struct Chart {
    pub layout: ChartLayout,
    pub svg: String,
}

pub fn build_chart(rows: &[CategoryRow], config: &ChartConfig) -> ChartResult<Chart> {
    config.validate()?;
    let mut layout = layout::compute_layout(rows, &config.layout, config.seed)?;
    for placed in &mut layout.samples {
        placed.sample.color = config.style.metric_color(placed.sample.metric).to_string();
    }
    let svg = render::render_svg(&layout, &config.style);
    tracing::info!(
        categories = layout.categories.len(),
        samples = layout.samples.len(),
        seed = config.seed,
        "chart built"
    );
    Ok(Chart { layout, svg })
}

pub fn build_sample_chart(config: &ChartConfig) -> ChartResult<Chart> {
    build_chart(&dataset::sample_table(), config)
}

pub fn layout_json(layout: &ChartLayout) -> ChartResult<String> {
    Ok(serde_json::to_string_pretty(layout)?)
}

/// Writes `content` to `output`, or to stdout when no path is given.
pub fn write_output(content: &str, output: Option<&Path>) -> ChartResult<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
            tracing::info!(path = %path.display(), bytes = content.len(), "wrote chart");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Logs go to stderr, or as JSON to a daily-rolling file under `log_dir`.
pub fn init_tracing(log_dir: Option<&Path>) -> ChartResult<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = tracing_appender::rolling::daily(log_dir, "radial-bubbles.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let _ = LOG_GUARD.set(guard);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_writer(non_blocking)
                .try_init()
                .map_err(|error| ChartError::Internal(error.to_string()))
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|error| ChartError::Internal(error.to_string())),
    }
}
