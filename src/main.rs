use anyhow::{anyhow, Context, Result};
use clap::Parser;
use scattergraph::{render, telemetry, Axis, ChartConfig, ChartController, ChartEvent, Dataset};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// `x=age` style axis selection from the command line
#[derive(Debug, Clone)]
struct SelectArg {
    axis: Axis,
    key: String,
}

impl FromStr for SelectArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (axis, key) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected AXIS=FIELD (e.g. x=age), got '{}'", s))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow!("Missing field name in '{}'", s));
        }
        Ok(SelectArg {
            axis: axis.parse()?,
            key: key.to_string(),
        })
    }
}

#[derive(Parser, Debug)]
#[command(name = "scattergraph")]
#[command(about = "Render the interactive census scatter plot to PNG", long_about = None)]
struct Args {
    #[arg(help = "CSV file with one row per region")]
    data: PathBuf,

    #[arg(long = "config", help = "JSON file overriding chart settings")]
    config: Option<PathBuf>,

    #[arg(short = 's', long = "select", help = "Click an axis label, e.g. x=age (repeatable)")]
    select: Vec<SelectArg>,

    #[arg(long = "step-ms", default_value = "1000", help = "Milliseconds between replayed clicks")]
    step_ms: u64,

    #[arg(long = "hover", help = "Hover the mark with this short label (e.g. AL)")]
    hover: Option<String>,

    #[arg(long = "at-ms", help = "Sample this many ms after the last event (default: transition length)")]
    at_ms: Option<u64>,

    #[arg(short = 'o', long = "output", help = "Write PNG here instead of stdout")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    if !telemetry::init_default_tracing() {
        warn!("tracing subscriber already installed; keeping it");
    }
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ChartConfig::load(path).context("Invalid chart configuration")?,
        None => ChartConfig::default(),
    };

    let dataset = Dataset::load(&args.data, &config.schema())
        .context("Failed to load chart data")?;
    let transition_ms = config.transition_ms;
    let mut chart = ChartController::new(Arc::new(dataset), config)
        .context("Failed to build chart")?;

    let step = Duration::from_millis(args.step_ms);
    let mut now = Duration::ZERO;
    for select in &args.select {
        now += step;
        let event = ChartEvent::LabelClicked {
            axis: select.axis,
            field_key: select.key.clone(),
        };
        chart
            .handle_event(event, now)
            .with_context(|| format!("Failed to select {}={}", select.axis, select.key))?;
    }

    if let Some(label) = &args.hover {
        let record = chart
            .dataset()
            .find_by_label(label)
            .map(|r| r.id())
            .ok_or_else(|| anyhow!("No record labelled '{}'", label))?;
        let pointer = chart
            .mark_center(record, now)
            .ok_or_else(|| anyhow!("Record '{}' has no mark", label))?;
        chart.handle_event(ChartEvent::HoverEnter { record, pointer }, now)?;
    }

    let at = now + Duration::from_millis(args.at_ms.unwrap_or(transition_ms));
    let frame = chart.frame(at);
    info!(
        x = chart.selection().x(),
        y = chart.selection().y(),
        at_ms = at.as_millis() as u64,
        "rendering frame"
    );

    let png_bytes = render::render_png(&frame).context("Failed to render chart")?;

    match &args.output {
        Some(path) => fs::write(path, &png_bytes)
            .with_context(|| format!("Failed to write PNG to '{}'", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&png_bytes)
                .context("Failed to write PNG to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
