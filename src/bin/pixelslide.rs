use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use pixelslide::{
    AssetLoader, Bitmap, CpuSurface, ImageSource, LoaderMode, RefreshLoop, RunPhase, SlideChange,
    SlideDeck, SlideUpdate, SurfaceSize, TransitionConfig, TransitionEngine,
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "pixelslide", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one frame of a transition between two images as a PNG.
    Frame(FrameArgs),
    /// Render every frame of a transition as numbered PNGs.
    Render(RenderArgs),
    /// Replay slideshow updates and render each pixel transition they trigger.
    Slides(SlidesArgs),
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// Transition config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for block variants and reveal order (overrides config and PIXELSLIDE_SEED).
    #[arg(long)]
    seed: Option<u64>,

    /// Transition duration in milliseconds (default from config).
    #[arg(long)]
    duration_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct PairArgs {
    /// Image shown before the transition.
    #[arg(long)]
    from: PathBuf,

    /// Image revealed by the transition.
    #[arg(long)]
    to: PathBuf,

    /// Surface width (default: width of `--to`).
    #[arg(long)]
    width: Option<u32>,

    /// Surface height (default: height of `--to`).
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    pair: PairArgs,

    #[command(flatten)]
    engine: EngineArgs,

    /// Time since the first frame, in milliseconds (default: half the duration).
    #[arg(long)]
    elapsed_ms: Option<u64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    pair: PairArgs,

    #[command(flatten)]
    engine: EngineArgs,

    /// Display refresh rate to simulate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output directory for `frame_NNNN.png`.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct SlidesArgs {
    /// JSON file with one slide update or an array of them.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    engine: EngineArgs,

    /// Surface width.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Surface height.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Display refresh rate to simulate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output directory; each pixel transition gets a `slide_NNN` subdirectory.
    #[arg(long)]
    out_dir: PathBuf,
}

type CpuEngine = TransitionEngine<CpuSurface, RefreshLoop>;

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Slides(args) => cmd_slides(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = load_config(&args.engine)?;
    let duration = duration_for(&args.engine, &config);
    let (previous, next) = load_pair(&args.pair)?;
    let size = surface_size(&args.pair, &next);

    let refresh = RefreshLoop::new();
    let mut engine = new_engine(size, &refresh, config)?;
    engine.begin_run(previous, next, duration, |_| {})?;

    let t0 = Instant::now();
    refresh.dispatch(t0, &mut [&mut engine]);
    let elapsed = args
        .elapsed_ms
        .map(Duration::from_millis)
        .unwrap_or(duration / 2);
    if !elapsed.is_zero() && engine.phase().is_active() {
        refresh.dispatch(t0 + elapsed, &mut [&mut engine]);
    }
    ensure_drawn(&engine)?;

    if let Some(stats) = engine.last_frame() {
        tracing::info!(
            progress = stats.progress,
            revealed = stats.revealed,
            total = stats.total,
            "frame rendered"
        );
    }
    write_png(engine.surface(), &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(&args.engine)?;
    let duration = duration_for(&args.engine, &config);
    let (previous, next) = load_pair(&args.pair)?;
    let size = surface_size(&args.pair, &next);

    let refresh = RefreshLoop::new();
    let mut engine = new_engine(size, &refresh, config)?;
    engine.begin_run(previous, next, duration, |_| {})?;

    let written = drive_to_end(&refresh, &mut engine, args.fps, &args.out_dir)?;
    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

fn cmd_slides(args: SlidesArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read slide updates '{}'", args.in_path.display()))?;
    let updates = SlideUpdate::list_from_json_str(&json)?;
    let config = load_config(&args.engine)?;
    let size = SurfaceSize::new(args.width, args.height);
    let mut deck = SlideDeck::new().with_pixel_duration(duration_for(&args.engine, &config));

    let refresh = RefreshLoop::new();
    let mut engine = new_engine(size, &refresh, config)?;

    for (index, update) in updates.into_iter().enumerate() {
        match deck.apply(update)? {
            SlideChange::Pixel(request) => {
                engine.begin_transition(request.previous, request.next, request.duration, |_| {});
                let dir = args.out_dir.join(format!("slide_{index:03}"));
                let written = drive_to_end(&refresh, &mut engine, args.fps, &dir)?;
                eprintln!("slide {index}: wrote {written} frames to {}", dir.display());
            }
            change => {
                tracing::info!(slide = index, ?change, "no pixel transition");
            }
        }
    }
    Ok(())
}

/// Dispatch refresh ticks `1/fps` apart until the run leaves `Loading`/`Running`, writing a PNG
/// after every drawn frame. Returns how many frames were written.
fn drive_to_end(
    refresh: &RefreshLoop,
    engine: &mut CpuEngine,
    fps: u32,
    out_dir: &Path,
) -> anyhow::Result<usize> {
    anyhow::ensure!(fps > 0, "fps must be > 0");
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;

    let interval = Duration::from_secs(1) / fps;
    let t0 = Instant::now();
    let mut tick = 0u32;
    let mut written = 0usize;
    while engine.phase().is_active() {
        let before = engine.last_frame();
        refresh.dispatch(t0 + interval * tick, &mut [&mut *engine]);
        tick = tick.saturating_add(1);

        if engine.last_frame().is_some() && engine.last_frame() != before {
            let path = out_dir.join(format!("frame_{written:04}.png"));
            write_png(engine.surface(), &path)?;
            written += 1;
        }
    }
    ensure_drawn(engine)?;
    Ok(written)
}

fn ensure_drawn(engine: &CpuEngine) -> anyhow::Result<()> {
    match engine.phase() {
        RunPhase::Failed(failure) => Err(failure.clone().into()),
        RunPhase::Cancelled(reason) => Err(anyhow::anyhow!(
            "transition cancelled ({reason:?}): {}",
            engine.last_error().unwrap_or("no error recorded")
        )),
        _ => Ok(()),
    }
}

fn load_config(args: &EngineArgs) -> anyhow::Result<TransitionConfig> {
    let mut config = match &args.config {
        Some(path) => TransitionConfig::from_json_file(path)?,
        None => TransitionConfig::default(),
    }
    .with_env_overrides();
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn duration_for(args: &EngineArgs, config: &TransitionConfig) -> Duration {
    args.duration_ms
        .map_or_else(|| config.default_duration(), Duration::from_millis)
}

fn load_pair(args: &PairArgs) -> anyhow::Result<(Bitmap, Bitmap)> {
    let pair = AssetLoader::new(LoaderMode::Inline)
        .load_pair(
            ImageSource::Path(args.from.clone()),
            ImageSource::Path(args.to.clone()),
        )
        .wait()?;
    Ok((pair.previous, pair.next))
}

fn surface_size(args: &PairArgs, next: &Bitmap) -> SurfaceSize {
    SurfaceSize::new(
        args.width.unwrap_or(next.width),
        args.height.unwrap_or(next.height),
    )
}

fn new_engine(
    size: SurfaceSize,
    refresh: &RefreshLoop,
    config: TransitionConfig,
) -> anyhow::Result<CpuEngine> {
    let engine = TransitionEngine::new(CpuSurface::new(size), refresh.clone(), config)?
        .with_loader(AssetLoader::new(LoaderMode::Inline));
    Ok(engine)
}

fn write_png(surface: &CpuSurface, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    surface
        .to_rgba_image()?
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
