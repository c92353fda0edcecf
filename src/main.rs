//! Headless replay of landmark data through the glasses try-on loop.

use anyhow::{Context, Result};
use clap::Parser;
use glasses_tryon::{
    config::{Config, EXAMPLE_CONFIG},
    frame_loop::{FrameLoop, LoopControl},
    interfaces::{DrawingSurface, FrameSource, LandmarkDetector},
    parameters::{ParameterStore, ParameterUpdate},
    playback::{LogRenderer, PlaybackSource, SyntheticFace, TraceDetector},
    surface::ImageSurface,
};
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Landmark trace to replay (YAML format)
    #[arg(short, long, conflicts_with = "synthetic")]
    trace: Option<String>,

    /// Replay this many frames of a synthetic swaying face
    #[arg(short, long, default_value = "300")]
    synthetic: u64,

    /// Seed for the synthetic face jitter
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Video width in pixels
    #[arg(long, default_value = "640")]
    width: u32,

    /// Video height in pixels
    #[arg(long, default_value = "480")]
    height: u32,

    /// Override the display refresh rate
    #[arg(long)]
    fps: Option<u32>,

    /// Update a transform setting before the run, e.g. `scaleMultiplier=6`
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Print the example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Glasses Try-On - headless replay");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    if let Some(fps) = args.fps {
        config.display.target_fps = fps;
    }
    config.validate()?;

    let params = ParameterStore::new(config.transform)?;
    for assignment in &args.set {
        let update = ParameterUpdate::parse_assignment(assignment)?;
        params
            .set(&update)
            .with_context(|| format!("Cannot apply setting '{assignment}'"))?;
    }

    let control = LoopControl::new(config.display.overlay_enabled);

    if let Some(trace_path) = &args.trace {
        let detector = TraceDetector::from_file(trace_path)
            .with_context(|| format!("Failed to load trace {trace_path}"))?;
        info!("Replaying {} trace frames from {trace_path}", detector.len());
        let frames = u64::try_from(detector.len())?;
        let source = PlaybackSource::new(args.width, args.height, frames, control.clone());
        let surface = ImageSurface::with_size(args.width, args.height);
        replay(source, detector, surface, params, control, &config)
    } else {
        info!("Replaying {} synthetic frames", args.synthetic);
        let source = PlaybackSource::new(args.width, args.height, args.synthetic, control.clone());
        let surface = ImageSurface::with_size(args.width, args.height);
        replay(source, SyntheticFace::new(args.seed, 0.002), surface, params, control, &config)
    }
}

fn replay<S, D>(
    source: S,
    detector: D,
    surface: ImageSurface,
    params: ParameterStore,
    control: LoopControl,
    config: &Config,
) -> Result<()>
where
    S: FrameSource,
    D: LandmarkDetector,
{
    let mut frame_loop = FrameLoop::new(source, detector, surface, LogRenderer::new(), params, control, config)?;
    let stats = frame_loop.run().clone();

    let renderer = frame_loop.renderer();
    let (width, height) = frame_loop.surface().dimensions();
    info!(
        "Done: {} ticks, {} shown, {} hidden, {} skipped, canvas {width}x{height}, final scale {:.3}",
        stats.ticks,
        renderer.shown(),
        renderer.hidden(),
        stats.skipped,
        frame_loop.stabilized_scale()
    );

    Ok(())
}
