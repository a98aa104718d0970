use clap::Parser;
use imagefixer::config::{self, ProcessingConfig};
use imagefixer::process::BatchReport;
use imagefixer::{output, process};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("IMAGEFIXER_ON_RELEASE_TAG");
    let hash = env!("IMAGEFIXER_GIT_HASH");
    if on_tag == "true" || hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Called once while building the command
        Box::leak(format!("{}-dev@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "imagefixer")]
#[command(about = "Resize images and create thumbnails")]
#[command(long_about = "\
Resize images and create thumbnails

Every JPEG gets a medium copy (<name>_md.jpg) scaled down by a whole-number
factor picked from its width, and a square thumbnail (<name>_sq_thumb.jpg)
cropped from the center of a copy scaled down twice as far.

When PATH is a directory, every *.jpg file directly inside it is processed
(extension matched in any case, subdirectories are not descended into).

Examples:
  imagefixer image.jpg                    # Process single image
  imagefixer /path/to/images/             # Process directory
  imagefixer image.jpg -o /output/        # Specify output directory
  imagefixer /images/ -q 95 -t 80         # Custom quality settings")]
#[command(version = version_string())]
struct Cli {
    /// Path to image file or directory containing images
    path: PathBuf,

    /// Output directory (default: same as input; ignored unless it exists)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JPEG quality for resized images (1-100)
    #[arg(short, long, default_value_t = 85)]
    quality: u32,

    /// JPEG quality for thumbnails (1-100)
    #[arg(short, long, default_value_t = 70)]
    thumbnail_quality: u32,

    /// Max parallel workers for directories (default: CPU cores)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Print the run report as JSON instead of progress lines
    #[arg(long)]
    json: bool,

    /// Log processing details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            e.print().ok();
            return code;
        }
    };
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(report) => {
            eprintln!(
                "Error: {} of {} images failed",
                report.failed.len(),
                report.failed.len() + report.processed.len()
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<BatchReport, Box<dyn std::error::Error>> {
    let config = ProcessingConfig::new(cli.quality, cli.thumbnail_quality)?
        .with_max_processes(cli.jobs);
    config.validate()?;
    init_thread_pool(&config);

    if cli.json {
        let report = process::process(&cli.path, cli.output.as_deref(), &config, None)?;
        println!("{}", output::format_report_json(&report)?);
        return Ok(report);
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });
    let result = process::process(&cli.path, cli.output.as_deref(), &config, Some(tx));
    printer.join().map_err(|_| "progress printer panicked")?;

    let report = result?;
    output::print_summary(&report);
    Ok(report)
}

/// Log to stderr so stdout stays clean for progress lines and `--json`.
///
/// `RUST_LOG` overrides the level picked by `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Size the global rayon pool from `--jobs`, capped at the core count.
fn init_thread_pool(processing: &ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
