//! Replay still images through the metrics engine as if they came from a camera.
//!
//! Usage: framegauge-replay [--config <path>] [--interval-ms <n> | --realtime] [--json] <image>...
//!
//! Frames are stamped `n * interval` by default. With `--realtime` they are stamped
//! on a stream clock as each image finishes decoding, as a live camera would.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use framegauge::timing::FrameClock;
use framegauge::{EngineConfig, FrameOutcome, Metrics, MetricsEngine, RawFrame};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

struct Args {
    config: Option<PathBuf>,
    interval: Duration,
    realtime: bool,
    json: bool,
    images: Vec<PathBuf>,
}

#[derive(Serialize)]
struct FrameReport {
    path: String,
    timestamp_ms: u64,
    throttled: bool,
    metrics: Option<Metrics>,
    error: Option<String>,
}

#[derive(Serialize)]
struct ReplayReport {
    generated_at: DateTime<Utc>,
    frames: Vec<FrameReport>,
    ready_frames: usize,
}

fn main() -> Result<()> {
    framegauge::init_logging();

    let args = parse_args(env::args().skip(1).collect())?;
    let config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::load_or_default(),
    };
    let mut engine = MetricsEngine::new(&config)?;
    let clock = FrameClock::new();

    let mut frames = Vec::with_capacity(args.images.len());
    for (index, path) in args.images.iter().enumerate() {
        let image = image::open(path)
            .with_context(|| format!("Failed to decode {}", path.display()))?
            .to_luma8();
        let timestamp = if args.realtime {
            clock.timestamp()
        } else {
            args.interval * index as u32
        };

        let report = match engine.process(&RawFrame::from_gray_image(&image, timestamp)) {
            Ok(FrameOutcome::Published(metrics)) => FrameReport {
                path: path.display().to_string(),
                timestamp_ms: timestamp.as_millis() as u64,
                throttled: false,
                metrics: Some(metrics),
                error: None,
            },
            Ok(FrameOutcome::Throttled) => FrameReport {
                path: path.display().to_string(),
                timestamp_ms: timestamp.as_millis() as u64,
                throttled: true,
                metrics: None,
                error: None,
            },
            Err(e) => FrameReport {
                path: path.display().to_string(),
                timestamp_ms: timestamp.as_millis() as u64,
                throttled: false,
                metrics: None,
                error: Some(e.to_string()),
            },
        };

        if !args.json {
            print_frame(&report);
        }
        frames.push(report);
    }

    let ready_frames = frames
        .iter()
        .filter_map(|f| f.metrics.as_ref())
        .filter(|m| m.is_capture_ready())
        .count();

    if args.json {
        let report = ReplayReport {
            generated_at: Utc::now(),
            frames,
            ready_frames,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let counters = engine.counters();
        println!(
            "{} processed, {} throttled, {} rejected, {} capture-ready",
            counters.processed, counters.throttled, counters.rejected, ready_frames
        );
    }

    Ok(())
}

fn print_frame(report: &FrameReport) {
    match (&report.metrics, &report.error) {
        (Some(m), _) => println!(
            "{} @{}ms sharp={:.1} angle={:.1} tilt={:.1} frontal={:.1} bright={:.1} shake={:.2} dist~{:.2} ready={} failing={:?}",
            report.path,
            report.timestamp_ms,
            m.sharpness(),
            m.angle(),
            m.tilt_vertical(),
            m.frontal(),
            m.brightness(),
            m.shake(),
            m.distance(),
            m.is_capture_ready(),
            m.flags().failing()
        ),
        (None, Some(e)) => println!("{} @{}ms rejected: {}", report.path, report.timestamp_ms, e),
        (None, None) => println!("{} @{}ms throttled", report.path, report.timestamp_ms),
    }
}

fn parse_args(raw: Vec<String>) -> Result<Args> {
    let mut args = Args {
        config: None,
        interval: Duration::from_millis(150),
        realtime: false,
        json: false,
        images: Vec::new(),
    };

    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--interval-ms" => {
                let ms: u64 = iter
                    .next()
                    .context("--interval-ms needs a value")?
                    .parse()
                    .context("--interval-ms must be an integer")?;
                args.interval = Duration::from_millis(ms);
            }
            "--realtime" => args.realtime = true,
            "--json" => args.json = true,
            _ => args.images.push(PathBuf::from(arg)),
        }
    }

    if args.images.is_empty() {
        bail!("Usage: framegauge-replay [--config <path>] [--interval-ms <n> | --realtime] [--json] <image>...");
    }
    Ok(args)
}
