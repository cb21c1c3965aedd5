//! bordercrop - border detection and auto-crop for scanned images
//!
//! CLI entry point

use bordercrop::batch::{plan_outputs, IMAGE_EXTENSIONS};
use bordercrop::progress::describe;
use bordercrop::{
    collect_image_files, exit_codes, load_image, output_path_for, BatchConfig, BatchProcessor,
    BatchSummary, BorderCropper, Cli, Commands, Config, Corner, CornersArgs, CropArgs, FileReport,
    OutputMode, ProgressTracker,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{warn, Level};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Crop(args) => run_crop(&args),
        Commands::Corners(args) => run_corners(&args),
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_codes::GENERAL_ERROR
        }
    });
}

/// Install the stderr log subscriber
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ============ Crop Command ============

fn run_crop(args: &CropArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.verbose, args.quiet);
    let start_time = Instant::now();
    let output_mode = OutputMode::from_flags(args.verbose, args.quiet);

    // Load config file if specified, otherwise look in the default locations
    let file_config = match &args.config {
        Some(config_path) => match Config::load_from_path(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}", e);
                Config::default()
            }
        },
        None => Config::load().unwrap_or_default(),
    };

    // CLI takes precedence over the config file
    let batch_config = match file_config.merge_with_cli(&args.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_codes::INVALID_ARGS);
        }
    };

    // Collect image files to process
    let mut sources = Vec::new();
    for input in &args.inputs {
        match collect_image_files(input) {
            Ok(files) => sources.extend(files),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(exit_codes::INPUT_NOT_FOUND);
            }
        }
    }
    if sources.is_empty() {
        eprintln!("Error: No image files found in input path");
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    // A single file may be written to an explicit output file
    let single_output = (sources.len() == 1 && args.inputs.len() == 1 && args.inputs[0].is_file())
        .then(|| output_path_for(&sources[0], &args.output, &batch_config.suffix));

    if args.dry_run {
        print_execution_plan(args, &sources, single_output.as_ref(), &batch_config);
        return Ok(());
    }

    let processor = BatchProcessor::new(batch_config);
    let reports = match single_output {
        Some(output) => {
            let status = processor.process_file(&sources[0], &output);
            vec![FileReport {
                source: sources[0].clone(),
                status,
            }]
        }
        None => {
            let tracker = ProgressTracker::new(sources.len(), output_mode);
            let reports =
                processor.run(&sources, &args.output, |report| tracker.file_done(report))?;
            tracker.finish();
            reports
        }
    };

    let summary = BatchSummary::from_reports(&reports);
    if output_mode.should_show(OutputMode::Normal) {
        if reports.len() == 1 {
            println!("{}", describe(&reports[0]));
        } else {
            ProgressTracker::print_summary(&summary);
        }
        println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    if summary.failed > 0 {
        return Err(format!("{} file(s) failed to process", summary.failed).into());
    }

    Ok(())
}

/// Print execution plan for dry-run mode
fn print_execution_plan(
    args: &CropArgs,
    sources: &[PathBuf],
    single_output: Option<&PathBuf>,
    config: &BatchConfig,
) {
    println!("=== Dry Run - Execution Plan ===");
    println!();
    println!("Output: {}", args.output.display());
    println!("Files to process: {}", sources.len());
    println!();
    println!("Crop Configuration:");
    println!("  Tolerance: {}", config.crop.tolerance);
    match config.crop.base_color {
        Some(color) => println!("  Base color: {}", color),
        None => println!("  Base color: corner vote"),
    }
    println!("  Suffix: {}", config.suffix);
    println!("  JPEG quality: {}", config.jpeg_quality);
    println!("  Threads: {}", config.threads.unwrap_or_else(num_cpus::get));
    println!("  Closeness map: {}", if config.closeness_map { "YES" } else { "NO" });
    println!();
    println!("Files:");
    let outputs = match single_output {
        Some(path) => vec![path.clone()],
        None => plan_outputs(sources, &args.output, &config.suffix),
    };
    for (i, (file, output)) in sources.iter().zip(&outputs).enumerate() {
        println!("  {}. {} -> {}", i + 1, file.display(), output.display());
    }
}

// ============ Corners Command ============

fn run_corners(args: &CornersArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.verbose, false);

    let image = load_image(&args.image)?;
    let vote = BorderCropper::vote_corners(&image)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&vote)?);
        return Ok(());
    }

    println!("Image: {} ({}x{})", args.image.display(), image.width(), image.height());
    println!();
    println!("Corners:");
    for (corner, score) in Corner::ALL.iter().zip(vote.scores.iter()) {
        let marker = if *corner == vote.winner { " *" } else { "" };
        println!(
            "  {:<13} {:<20} score {:>8.3}{}",
            corner.name(),
            vote.color(*corner).to_string(),
            score,
            marker
        );
    }
    println!();
    println!("Edges:");
    println!("  top    {:>8.3}", vote.edges.top);
    println!("  left   {:>8.3}", vote.edges.left);
    println!("  right  {:>8.3}", vote.edges.right);
    println!("  bottom {:>8.3}", vote.edges.bottom);
    println!();
    println!("Base color: {} ({})", vote.base_color(), vote.winner);

    Ok(())
}

// ============ Info Command ============

fn run_info() -> Result<(), Box<dyn std::error::Error>> {
    println!("bordercrop v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());

    println!();
    println!("Supported extensions:");
    println!("  {}", IMAGE_EXTENSIONS.join(", "));

    println!();
    println!("Config File Locations:");
    for path in Config::default_paths() {
        let state = if path.is_file() { "found" } else { "not found" };
        println!("  {} ({})", path.display(), state);
    }

    Ok(())
}
