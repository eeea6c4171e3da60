use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use cutlist_core::config::{Algorithm, EngineConfig, EngineDefaults, PackOptions, SortOrder};
use cutlist_core::model::{BoardSpec, PartSpec};
use cutlist_core::validate::sanitize;
use cutlist_core::{pack_boards, to_json, to_json_flat};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "cutlist",
    about = "Nest rectangular parts onto stock sheets",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a job file and write the sheet layout as JSON
    Pack(PackArgs),
    /// Pack a job file with every strategy and print sheets, utilization and time
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// Job file (.json, .yaml or .yml)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output file; prints to stdout when omitted
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    /// Output shape: nested (per material/sheet) | flat (per part signature)
    #[arg(long, default_value = "nested", value_parser = ["nested", "flat"], help_heading = "Input/Output")]
    format: String,

    /// Saw kerf (overrides the job file)
    #[arg(long, help_heading = "Cutting")]
    kerf: Option<f64>,
    /// Sheet edge margin (overrides the job file)
    #[arg(long, help_heading = "Cutting")]
    margin: Option<f64>,
    /// Forbid rotation for boards that do not state their own permission
    #[arg(long, default_value_t = false, help_heading = "Cutting")]
    no_rotate: bool,

    /// Algorithm: maxrects | skyline
    #[arg(long, value_parser = ["maxrects", "skyline"], help_heading = "Algorithms")]
    algorithm: Option<String>,
    /// Sort order: none|area_desc|max_side_desc|height_desc|width_desc|name_asc
    #[arg(long, help_heading = "Algorithms")]
    sort_order: Option<String>,

    /// Print the merged configuration and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: pack and log stats but do not write output
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Job file (.json, .yaml or .yml)
    input: PathBuf,
    /// Sort order: none|area_desc|max_side_desc|height_desc|width_desc|name_asc
    #[arg(long)]
    sort_order: Option<String>,
}

/// Job file: stock, demand and settings in one document.
#[derive(Debug, Deserialize)]
struct JobFile {
    boards: Vec<BoardSpec>,
    parts: Vec<PartSpec>,
    #[serde(default)]
    defaults: EngineDefaults,
    #[serde(default)]
    options: PackOptions,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Bench(args) => run_bench(args),
    }
}

fn load_job(path: &Path) -> anyhow::Result<JobFile> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read job file {}", path.display()))?;
    let job: JobFile = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
            .with_context(|| format!("parse YAML job {}", path.display()))?,
        _ => serde_json::from_str(&text)
            .with_context(|| format!("parse JSON job {}", path.display()))?,
    };
    let clean = sanitize(job.boards, job.parts);
    for rejected in &clean.rejected {
        warn!(%rejected, "skipping row");
    }
    Ok(JobFile {
        boards: clean.boards,
        parts: clean.parts,
        defaults: job.defaults,
        options: job.options,
    })
}

fn merge_options(job: &PackOptions, cli: &PackArgs) -> anyhow::Result<PackOptions> {
    let mut opts = *job;
    if cli.kerf.is_some() {
        opts.kerf = cli.kerf;
    }
    if cli.margin.is_some() {
        opts.margin = cli.margin;
    }
    if cli.no_rotate {
        opts.allow_rotate_default = Some(false);
    }
    if let Some(a) = &cli.algorithm {
        opts.algorithm = Some(a.parse::<Algorithm>()?);
    }
    if let Some(s) = &cli.sort_order {
        opts.sort_order = Some(s.parse::<SortOrder>()?);
    }
    Ok(opts)
}

fn run_pack(cli: &PackArgs) -> anyhow::Result<()> {
    let job = load_job(&cli.input)?;
    let opts = merge_options(&job.options, cli)?;
    let cfg = EngineConfig::resolve(&job.defaults, &opts);

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    info!(
        boards = job.boards.len(),
        parts = job.parts.len(),
        kerf = cfg.kerf,
        margin = cfg.margin,
        algorithm = ?cfg.algorithm,
        "packing job"
    );
    let result = pack_boards(&job.boards, &job.parts, &cfg);
    let stats = result.stats();
    info!("{}", stats.summary());
    if !result.unplaced.is_empty() {
        warn!(count = result.unplaced.len(), "some parts did not fit the available stock");
    }

    if cli.dry_run {
        return Ok(());
    }
    let value = match cli.format.as_str() {
        "flat" => to_json_flat(&result),
        _ => to_json(&result),
    };
    let json = serde_json::to_string_pretty(&value)?;
    match &cli.out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
            info!(?path, sheets = stats.sheets, "layout written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    let job = load_job(&b.input)?;
    let mut opts = job.options;
    if let Some(s) = &b.sort_order {
        opts.sort_order = Some(s.parse::<SortOrder>()?);
    }
    for algorithm in [Algorithm::MaxRects, Algorithm::Skyline] {
        opts.algorithm = Some(algorithm);
        let cfg = EngineConfig::resolve(&job.defaults, &opts);
        let start = Instant::now();
        let result = pack_boards(&job.boards, &job.parts, &cfg);
        let dur = start.elapsed();
        let stats = result.stats();
        println!(
            "{:?}: sheets={} unplaced={} utilization={:.2}% time={}",
            algorithm,
            stats.sheets,
            stats.unplaced,
            stats.utilization * 100.0,
            bench_fmt_dur(dur)
        );
    }
    Ok(())
}

fn bench_fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
