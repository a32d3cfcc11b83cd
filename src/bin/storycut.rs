use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use storycut::{
    CheckFlags, ChunkFileSink, FetchEngine, FetchOpts, FetchResult, FileVideoOpener, InMemorySink,
    PlanningCompositor, Storyboard, TimelineResolver, VideoCache, run_fetch,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storycut", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the fetch decision for every frame of a storyboard.
    Plan(PlanArgs),
    /// Cut a storyboard into an MPEG elementary stream without re-encoding.
    Cut(CutArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Input storyboard JSON.
    #[arg(long)]
    storyboard: PathBuf,

    /// Fetch options JSON; defaults are derived from the storyboard.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Check flags, comma separated (size, full_frame, mpeg_integrity, jpg, png, vcodec_name).
    #[arg(long)]
    check: Option<String>,

    /// Largest compressed chunk to pass through, in bytes.
    #[arg(long)]
    max_chunk_bytes: Option<u32>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    fetch: FetchArgs,

    /// Allow decoded source pixels instead of composites.
    #[arg(long, default_value_t = false)]
    raw: bool,
}

#[derive(Args, Debug)]
struct CutArgs {
    #[command(flatten)]
    fetch: FetchArgs,

    /// Output elementary stream path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Cut(args) => cmd_cut(args),
    }
}

fn load(args: &FetchArgs) -> anyhow::Result<(Storyboard, FetchOpts)> {
    let sb = Storyboard::from_json_path(&args.storyboard)?;
    let mut opts = match &args.opts {
        Some(path) => FetchOpts::from_json_path(path)?,
        None => FetchOpts::for_storyboard(&sb),
    };
    if opts.target_width == 0 || opts.target_height == 0 {
        opts.target_width = sb.canvas.width;
        opts.target_height = sb.canvas.height;
    }
    if opts.total_output_frames == 0 {
        opts.total_output_frames = sb.total_frames();
    }
    if let Some(check) = &args.check {
        opts.check_flags = check
            .parse::<CheckFlags>()
            .with_context(|| format!("parse --check '{check}'"))?;
    }
    if let Some(max) = args.max_chunk_bytes {
        opts.max_chunk_bytes = max;
    }
    opts.validate()?;
    Ok((sb, opts))
}

fn storyboard_root(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let (sb, mut opts) = load(&args.fetch)?;
    opts.allow_raw_pixel_output |= args.raw;

    let resolver = TimelineResolver::new(&sb, storyboard_root(&args.fetch.storyboard));
    let mut videos = VideoCache::new(FileVideoOpener);
    let mut compositor = PlanningCompositor::new();
    let mut engine = FetchEngine::new(&resolver, &mut videos, &mut compositor);

    let mut sink = InMemorySink::new();
    let stats = run_fetch(&mut engine, &opts, &mut sink)?;

    for (master, result) in sink.frames() {
        let nr = master.0;
        let key = if result.force_keyframe() { " key" } else { "" };
        match result {
            FetchResult::CompressedChunk {
                total_size,
                header_size,
                ..
            } => println!(
                "{nr:>6} chunk     {total_size} bytes (header {header_size}){key}"
            ),
            other => println!("{nr:>6} {:<9}{key}", other.kind_name()),
        }
    }
    println!(
        "{} frames: {} chunks, {} composites, {} raw, {} forced keyframes",
        stats.frames_total, stats.chunks, stats.composites, stats.raw_frames, stats.forced_keyframes
    );
    Ok(())
}

fn cmd_cut(args: CutArgs) -> anyhow::Result<()> {
    let (sb, mut opts) = load(&args.fetch)?;
    opts.allow_chunk_passthrough = true;
    opts.allow_raw_pixel_output = false;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let resolver = TimelineResolver::new(&sb, storyboard_root(&args.fetch.storyboard));
    let mut videos = VideoCache::new(FileVideoOpener);
    let mut compositor = PlanningCompositor::new();
    let mut engine = FetchEngine::new(&resolver, &mut videos, &mut compositor);

    let mut sink = ChunkFileSink::new(&args.out);
    let stats = run_fetch(&mut engine, &opts, &mut sink)?;

    eprintln!(
        "wrote {} ({} frames, {} bytes)",
        args.out.display(),
        stats.frames_total,
        sink.bytes_written()
    );
    Ok(())
}
