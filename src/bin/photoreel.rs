use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "photoreel", version, about = "Photo slideshow video maker")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit every photo onto the canvas and write JPEGs to `<output>/processed_photos`.
    Prepare(PrepareArgs),
    /// Print slide durations, caption groups and the audio plan without encoding.
    Plan(PlanArgs),
    /// Render the slideshow video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct PrepareArgs {
    /// Input directory containing `photos/`.
    #[arg(long)]
    input: PathBuf,

    /// Output directory.
    #[arg(long)]
    output: PathBuf,

    /// Optional configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input directory (`photos/`, `text.txt`, `bgm.*`, `fonts/`).
    #[arg(long)]
    input: PathBuf,

    /// Optional configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the plan as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Ignore the audio bed when timing slides.
    #[arg(long, default_value_t = false)]
    no_audio: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input directory (`photos/`, `text.txt`, `bgm.*`, `fonts/`).
    #[arg(long)]
    input: PathBuf,

    /// Output video path.
    #[arg(long)]
    output: PathBuf,

    /// Optional configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render a silent video even when an audio bed is present.
    #[arg(long, default_value_t = false)]
    no_audio: bool,

    /// Rasterize slides on the current thread only.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Prepare(args) => cmd_prepare(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<photoreel::SlideshowConfig> {
    let cfg = match path {
        Some(p) => photoreel::SlideshowConfig::from_path(p)?,
        None => photoreel::SlideshowConfig::default(),
    };
    Ok(cfg)
}

fn cmd_prepare(args: PrepareArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let report = photoreel::prepare_photos(&args.input, &args.output, &cfg.canvas)?;
    for (path, reason) in &report.skipped {
        eprintln!("skipped {}: {reason}", path.display());
    }
    eprintln!(
        "wrote {} photos to {}",
        report.written.len(),
        args.output.join("processed_photos").display()
    );
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let manifest = photoreel::AssetManifest::discover(
        &args.input,
        &cfg,
        photoreel::DiscoverOpts {
            with_audio: !args.no_audio,
        },
    )?;
    let plan = photoreel::plan(&manifest, &cfg)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    for s in &plan.slides {
        println!(
            "{:>3}  {:>8.2}s  +{:>7.2}s  {}",
            s.index,
            s.start_secs,
            s.duration_secs,
            s.photo.display()
        );
        for line in &s.captions {
            println!("       | {line}");
        }
    }
    println!(
        "total {:.2}s (budget {:.2}s)",
        plan.total_secs, plan.budget_secs
    );
    match &plan.audio {
        None => println!("audio: none"),
        Some(a) => println!(
            "audio: {} ({:.2}s, {:?}, cut at {:.2}s)",
            a.track.path.display(),
            a.track.duration_secs,
            a.fit,
            a.cut_at_secs
        ),
    }
    for w in &plan.warnings {
        println!("warning: {w}");
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if args.sequential {
        cfg.render.parallel = false;
    }
    if args.threads.is_some() {
        cfg.render.threads = args.threads;
    }

    let report = photoreel::create_video(
        &args.input,
        &args.output,
        &cfg,
        photoreel::CreateOpts {
            with_audio: !args.no_audio,
        },
    )?;
    for w in &report.warnings {
        eprintln!("warning: {w}");
    }
    eprintln!(
        "wrote {} ({:.2}s, {} slides)",
        report.output.display(),
        report.video_secs,
        report.plan.slides.len()
    );
    Ok(())
}
