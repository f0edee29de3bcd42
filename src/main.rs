use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use segtier::audio::WavStreamReader;
use segtier::config::Config;
use segtier::segmenter::AutoSegmenter;
use segtier::tier::{JsonTierStore, TierStore};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "segtier")]
#[command(version, about = "Automatic audio segmentation into a time tier")]
#[command(
    long_about = "Partition a WAV recording into transcription-sized segments, preferring cut points in quiet regions, and store them as a time-tier annotation file."
)]
struct Cli {
    /// Input WAV file
    input: PathBuf,

    /// Annotation file path (default: <input>.annotations.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Re-segment even if an annotation file already exists
    #[arg(long)]
    force: bool,

    /// Minimum segment length in milliseconds
    #[arg(long)]
    min_ms: Option<u64>,

    /// Maximum segment length in milliseconds
    #[arg(long)]
    max_ms: Option<u64>,

    /// Preferred pause length in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Optimum-length clamping factor
    #[arg(long)]
    clamping_factor: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(ms) = cli.min_ms {
        config.segmenter.min_segment_ms = ms;
    }
    if let Some(ms) = cli.max_ms {
        config.segmenter.max_segment_ms = ms;
    }
    if let Some(ms) = cli.pause_ms {
        config.segmenter.preferred_pause_ms = ms;
    }
    if let Some(factor) = cli.clamping_factor {
        config.segmenter.clamping_factor = factor;
    }
    config.validate().context("Configuration validation failed")?;

    info!("Input: {}", cli.input.display());

    let mut store = JsonTierStore::new().with_naming(config.side_files.clone());
    if let Some(output) = cli.output.clone() {
        store = store.with_artifact_path(output);
    }

    let reader = WavStreamReader::open(&cli.input).context("Failed to open input audio")?;
    let mut segmenter = AutoSegmenter::new(&cli.input, reader, config);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("Searching for natural breaks...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let artifact = if cli.force {
        segmenter.run_forced(&store)?
    } else {
        segmenter.run(&store)?
    };

    spinner.finish_with_message("✓ Segmentation complete");

    let tier = store
        .load(&cli.input)?
        .context("Annotation artifact disappeared after save")?;

    println!();
    println!("  Annotation: {}", artifact.display());
    println!("  Segments:   {}", tier.segments().len());
    for (i, segment) in tier.segments().iter().enumerate() {
        println!(
            "    {:>4}  {:>9.3}s  ->  {:>9.3}s  ({:.3}s)",
            i + 1,
            segment.start,
            segment.end,
            segment.duration()
        );
    }

    Ok(())
}
