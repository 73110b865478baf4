use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "confetti-burst", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a standalone HTML page holding one exploded burst.
    Html(HtmlArgs),
    /// Print the synthesized parameters of every particle as JSON lines.
    Params(OptionArgs),
}

#[derive(Parser, Debug)]
struct OptionArgs {
    /// Options JSON (camelCase keys, all optional).
    #[arg(long)]
    options: Option<PathBuf>,

    /// Override `particleCount`.
    #[arg(long)]
    count: Option<u32>,

    /// Override the random seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct HtmlArgs {
    #[command(flatten)]
    opts: OptionArgs,

    /// Output HTML path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(serde::Serialize)]
struct ParticleLine<'a> {
    index: usize,
    degree: f64,
    color: &'a str,
    params: confetti_burst::ParameterSet,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Html(args) => cmd_html(args),
        Command::Params(args) => cmd_params(args),
    }
}

fn read_options(path: &Path) -> anyhow::Result<confetti_burst::ConfettiOptions> {
    let f = File::open(path).with_context(|| format!("open options '{}'", path.display()))?;
    let opts = confetti_burst::ConfettiOptions::from_reader(BufReader::new(f))
        .with_context(|| format!("parse options '{}'", path.display()))?;
    Ok(opts)
}

fn load_options(args: &OptionArgs) -> anyhow::Result<confetti_burst::ConfettiOptions> {
    let mut opts = match &args.options {
        Some(path) => read_options(path)?,
        None => confetti_burst::ConfettiOptions::new(),
    };
    if let Some(count) = args.count {
        opts.particle_count = Some(count);
    }
    if let Some(seed) = args.seed {
        opts.seed = Some(seed);
    }
    Ok(opts)
}

fn cmd_html(args: HtmlArgs) -> anyhow::Result<()> {
    let opts = load_options(&args.opts)?;

    let stage = confetti_burst::MemoryStage::new();
    let container = stage.create_container()?;
    let events = confetti_burst::EventLoop::new();
    let burst = confetti_burst::explode(stage.clone(), container, &opts, events)?;
    let html = stage.to_html()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, html)
        .with_context(|| format!("write html '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} particles)",
        args.out.display(),
        burst.unit_count()
    );
    Ok(())
}

fn cmd_params(args: OptionArgs) -> anyhow::Result<()> {
    let opts = load_options(&args)?;
    let cfg = confetti_burst::EffectiveConfig::resolve(&opts)?;
    let particles = confetti_burst::generate(cfg.particle_count, &cfg.colors)?;
    let mut rng = match cfg.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_rng(&mut rand::rng()),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (index, particle) in particles.iter().enumerate() {
        let line = ParticleLine {
            index,
            degree: particle.degree,
            color: &particle.color,
            params: confetti_burst::synthesize(particle, &cfg, &mut rng),
        };
        serde_json::to_writer(&mut out, &line).context("encode particle")?;
        out.write_all(b"\n").context("write stdout")?;
    }
    Ok(())
}
