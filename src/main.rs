use anyhow::Context;
use clap::Parser;
use radial_bubbles::config::ChartConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "radial-bubbles",
    version,
    about = "Render the mobile app performance radial bubble chart as SVG"
)]
struct Cli {
    /// YAML or JSON chart configuration.
    #[arg(short, long, env = "RADIAL_BUBBLES_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides the jitter seed from the configuration.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write JSON logs to a daily-rolling file in this directory instead of stderr.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Print the computed layout as JSON instead of the SVG.
    #[arg(long)]
    dump_layout: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    radial_bubbles::init_tracing(cli.log_dir.as_deref()).context("failed to initialise logging")?;

    let mut config = match &cli.config {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ChartConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let chart = radial_bubbles::build_sample_chart(&config).context("failed to build chart")?;
    let content = if cli.dump_layout {
        radial_bubbles::layout_json(&chart.layout).context("failed to serialise layout")?
    } else {
        chart.svg
    };

    radial_bubbles::write_output(&content, cli.output.as_deref()).context("failed to write chart")?;
    Ok(())
}
