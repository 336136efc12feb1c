//! edgecam CLI
//!
//! Command-line interface for filtering raw NV21 frames and benchmarking the
//! edge filter.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use edgecam::{
    filter::{BACKGROUND, EDGE, EDGE_THRESHOLD},
    FilterConfig, FrameFilter, FrameLayout, Mode,
};
use std::path::PathBuf;

/// Filter mode for CLI
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMode {
    /// Copy the frame unchanged
    Passthrough,
    /// Binary Sobel edge mask on luma
    Edge,
}

impl From<CliMode> for Mode {
    fn from(m: CliMode) -> Self {
        match m {
            CliMode::Passthrough => Mode::PassThrough,
            CliMode::Edge => Mode::EdgeDetect,
        }
    }
}

#[derive(Parser)]
#[command(name = "edgecam")]
#[command(about = "Real-time Sobel edge filter for NV21/NV12 camera frames")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show filter constants and supported modes
    Info,

    /// Filter a raw NV21/NV12 frame file
    Process {
        /// Raw input frame
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the filtered frame
        #[arg(short, long)]
        output: PathBuf,

        /// Frame width
        #[arg(short = 'W', long)]
        width: u32,

        /// Frame height
        #[arg(short = 'H', long)]
        height: u32,

        /// Filter mode (overrides the config file)
        #[arg(short, long, value_enum)]
        mode: Option<CliMode>,

        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Shard the scan across all cores
        #[arg(short, long)]
        parallel: bool,
    },

    /// Run filter benchmark on a synthetic frame
    Bench {
        /// Resolution (e.g., 1280x720)
        #[arg(short, long, default_value = "1280x720")]
        resolution: String,

        /// Number of frames to filter
        #[arg(short, long, default_value = "300")]
        frames: u32,

        /// Shard the scan across all cores
        #[arg(short, long)]
        parallel: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("edgecam=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info => cmd_info(),
        Commands::Process {
            input,
            output,
            width,
            height,
            mode,
            config,
            parallel,
        } => cmd_process(input, output, width, height, mode, config, parallel),
        Commands::Bench {
            resolution,
            frames,
            parallel,
        } => cmd_bench(resolution, frames, parallel),
    }
}

fn cmd_info() -> anyhow::Result<()> {
    println!("edgecam {}", edgecam::VERSION);
    println!("==============\n");

    println!("Modes:");
    println!("  passthrough  copy frame unchanged");
    println!("  edge         binary Sobel edge mask on luma, chroma kept");
    println!();
    println!("Frame layout: Y plane (W*H) + interleaved chroma (W*H/2)");
    println!("Edge threshold: magnitude > {}", EDGE_THRESHOLD);
    println!("Edge value: {}  Background: {}", EDGE, BACKGROUND);
    println!("Worker threads (parallel scan): {}", rayon::current_num_threads());

    Ok(())
}

fn cmd_process(
    input: PathBuf,
    output: PathBuf,
    width: u32,
    height: u32,
    mode: Option<CliMode>,
    config: Option<PathBuf>,
    parallel: bool,
) -> anyhow::Result<()> {
    let mut cfg = match config {
        Some(path) => FilterConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FilterConfig::default(),
    };
    if let Some(m) = mode {
        cfg.mode = m.into();
    }
    if parallel {
        cfg.parallel = true;
    }

    let data =
        std::fs::read(&input).with_context(|| format!("reading frame {}", input.display()))?;
    let mut filtered = vec![0u8; data.len()];

    let filter = FrameFilter::from_config(&cfg);
    let stats = filter
        .process_with_stats(&data, width, height, &mut filtered, cfg.mode)
        .with_context(|| format!("filtering {}x{} frame", width, height))?;

    std::fs::write(&output, &filtered)
        .with_context(|| format!("writing frame {}", output.display()))?;

    println!("Processed {} ({}x{}, mode {})", input.display(), width, height, cfg.mode);
    if cfg.mode == Mode::EdgeDetect {
        println!("  {}", stats);
    }
    println!("Wrote {}", output.display());

    Ok(())
}

fn cmd_bench(resolution: String, frames: u32, parallel: bool) -> anyhow::Result<()> {
    println!("edgecam Filter Benchmark");
    println!("========================\n");

    let res: edgecam::Resolution = resolution.parse()?;
    let layout = FrameLayout::new(res.width, res.height)?;
    let frames = frames.max(1);

    // Diagonal bands give a realistic mix of edge and flat pixels
    let mut input = vec![128u8; layout.total_len()];
    for (i, px) in input[..layout.luma_len()].iter_mut().enumerate() {
        let (x, y) = (i % layout.width, i / layout.width);
        *px = if ((x + y) / 16) % 2 == 0 { 40 } else { 210 };
    }
    let mut output = vec![0u8; layout.total_len()];

    let filter = FrameFilter::new().with_parallel(parallel);

    println!("Resolution: {}", res);
    println!("Frames: {}", frames);
    println!("Parallel: {}", if parallel { "Yes" } else { "No" });
    println!("\nRunning benchmark...\n");

    let start = std::time::Instant::now();
    for _ in 0..frames {
        filter.process(&input, res.width, res.height, &mut output, Mode::EdgeDetect)?;
    }
    let elapsed = start.elapsed();

    let fps = frames as f64 / elapsed.as_secs_f64();
    let ms_per_frame = elapsed.as_secs_f64() * 1000.0 / frames as f64;

    println!("Results:");
    println!("  Total time: {:.2}s", elapsed.as_secs_f64());
    println!("  Filter FPS: {:.1}", fps);
    println!("  ms/frame: {:.3}", ms_per_frame);
    println!(
        "  Realtime capable (30fps): {}",
        if fps >= 30.0 { "Yes" } else { "No" }
    );
    println!(
        "  Realtime capable (60fps): {}",
        if fps >= 60.0 { "Yes" } else { "No" }
    );

    Ok(())
}
