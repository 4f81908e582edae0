use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "afterglow", version)]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a stage configuration.
    Check(CheckArgs),
    /// Run a stage headlessly and write every frame as a JSON line.
    Simulate(SimulateArgs),
    /// Print an ASCII rendering of one frame.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Stage configuration JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Stage configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// How long to run, in milliseconds of virtual time.
    #[arg(long)]
    duration_ms: u64,

    /// Frames per second of virtual time.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Timed input script (JSON array of `{ "at_ms", "type", ... }`).
    #[arg(long)]
    script: Option<PathBuf>,

    /// Output JSON-lines path. Defaults to stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Stage configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Time of the frame to show, in milliseconds.
    #[arg(long)]
    at_ms: u64,

    /// Grid width in characters.
    #[arg(long, default_value_t = 80)]
    cols: usize,

    /// Grid height in characters, including the text line.
    #[arg(long, default_value_t = 24)]
    rows: usize,

    /// Frames per second used to reach `--at-ms`.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Timed input script played up to `--at-ms`.
    #[arg(long)]
    script: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_config(path: &Path) -> anyhow::Result<afterglow::StageConfig> {
    let cfg = afterglow::StageConfig::from_path(path)
        .with_context(|| format!("load stage config '{}'", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate stage config '{}'", path.display()))?;
    Ok(cfg)
}

fn read_script(path: Option<&Path>) -> anyhow::Result<Vec<afterglow::TimedInput>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read input script '{}'", path.display()))?;
    let script = afterglow::parse_script(&json)
        .with_context(|| format!("parse input script '{}'", path.display()))?;
    Ok(script)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.config)?;
    let on_off = |b: bool| if b { "on" } else { "off" };

    println!("config:     {}", args.config.display());
    println!(
        "viewport:   {}x{}",
        cfg.viewport.width, cfg.viewport.height
    );
    println!("seed:       {}", cfg.seed);
    println!("pool:       {}", cfg.pool_capacity);
    println!(
        "typist:     {}",
        cfg.typist
            .as_ref()
            .map_or("off".to_owned(), |t| format!("{} phrases", t.phrases.len()))
    );
    println!(
        "star field: {}",
        cfg.star_field
            .as_ref()
            .map_or("off".to_owned(), |s| format!("{} stars", s.count))
    );
    println!(
        "burst:      {}",
        cfg.burst
            .as_ref()
            .map_or("off".to_owned(), |b| format!("{:?} x{}", b.kind, b.count))
    );
    println!("unlock:     {}", on_off(cfg.unlock.is_some()));
    println!(
        "boot:       {}",
        cfg.boot
            .as_ref()
            .map_or("off".to_owned(), |b| format!("{} lines", b.lines.len()))
    );
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.config)?;
    let script = read_script(args.script.as_deref())?;
    let clock = afterglow::FrameClock::from_fps(args.fps)?;
    let stage = afterglow::Stage::new(cfg)?;
    let until = Duration::from_millis(args.duration_ms);

    let out: Box<dyn Write> = match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            Box::new(BufWriter::new(f))
        }
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    let mut surface = afterglow::JsonLinesSurface::new(out);
    let stats = afterglow::run_script(stage, &script, until, clock, &mut surface)?;
    surface.into_inner()?;

    if stats.rejected > 0 {
        anyhow::bail!("{} of {} frames could not be written", stats.rejected, stats.frames);
    }
    if let Some(path) = &args.out {
        eprintln!(
            "wrote {} frames ({} inputs, {} bursts) to {}",
            stats.frames,
            stats.inputs,
            stats.bursts,
            path.display()
        );
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.config)?;
    let script = read_script(args.script.as_deref())?;
    let clock = afterglow::FrameClock::from_fps(args.fps)?;
    let stage = afterglow::Stage::new(cfg)?;
    let until = Duration::from_millis(args.at_ms);

    let mut surface = afterglow::AsciiSurface::new(args.cols, args.rows)?;
    let stats = afterglow::run_script(stage, &script, until, clock, &mut surface)?;

    println!("{}", surface.text());
    eprintln!("frame {} at ~{} ms", stats.frames.saturating_sub(1), args.at_ms);
    Ok(())
}
