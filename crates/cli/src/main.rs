//! CLI tool for adding page numbers to PowerPoint files.

use anyhow::{Context, Result};
use clap::Parser;
use pagenum_core::{NumberingOptions, ProgressListener, ShapeStyle, StagingMode};
use pagenum_pptx::{archive, locate, FileInput, FileOutput, SlideNumberer};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Add a page number to every slide of a .pptx presentation.
#[derive(Parser, Debug)]
#[command(name = "pptx-pagenum")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input presentation (.pptx)
    input: PathBuf,

    /// Output file (default: numbered_presentation_<timestamp>.pptx next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List the slide parts and the numbers they would get, then exit
    #[arg(short, long)]
    list: bool,

    /// JSON file with the page-number shape style
    #[arg(long)]
    style: Option<PathBuf>,

    /// Typeface of the page number
    #[arg(long)]
    font: Option<String>,

    /// Font size in points
    #[arg(long)]
    font_size: Option<f32>,

    /// Text color as RGB hex, e.g. 000000
    #[arg(long)]
    color: Option<String>,

    /// Stage the package in memory instead of a temporary directory
    #[arg(long, conflicts_with = "staging_dir")]
    in_memory: bool,

    /// Parent directory for the temporary staging directory
    #[arg(long)]
    staging_dir: Option<PathBuf>,

    /// Print the outcome as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if args.list {
        list_slides(&args.input, args.json)?;
        return Ok(ExitCode::SUCCESS);
    }

    let options = NumberingOptions::new()
        .with_style(load_style(&args)?)
        .with_staging(staging_mode(&args));

    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => default_output_path(&args.input),
    };

    log::debug!(
        "Numbering {} into {}",
        args.input.display(),
        output_path.display()
    );

    let numberer = SlideNumberer::with_options(options);
    let outcome = numberer.process(
        &FileInput::new(&args.input),
        &FileOutput::new(&output_path),
        &LogListener,
    );

    if args.json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else if outcome.is_success() {
        eprintln!("Written to: {}", output_path.display());
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Prints progress as timestamped log lines on stderr.
struct LogListener;

impl LogListener {
    fn log(message: &str) {
        eprintln!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), message);
    }
}

impl ProgressListener for LogListener {
    fn on_progress(&self, _percent: u8, message: &str) {
        Self::log(message);
    }

    fn on_complete(&self, success: bool, message: &str) {
        if success {
            Self::log(message);
        } else {
            Self::log(&format!("Failed: {}", message));
        }
    }
}

/// Build the shape style from `--style` and the individual overrides.
fn load_style(args: &Args) -> Result<ShapeStyle> {
    let mut style = match &args.style {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open style file {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Invalid style file {}", path.display()))?
        }
        None => ShapeStyle::default(),
    };

    if let Some(font) = &args.font {
        style = style.with_typeface(font.as_str());
    }
    if let Some(points) = args.font_size {
        anyhow::ensure!(points > 0.0, "Font size must be positive");
        style = style.with_font_size((points * 100.0).round() as u32);
    }
    if let Some(color) = &args.color {
        style = style.with_color(color.as_str());
    }

    Ok(style)
}

fn staging_mode(args: &Args) -> StagingMode {
    if args.in_memory {
        StagingMode::Memory
    } else {
        StagingMode::Disk {
            root: args.staging_dir.clone(),
        }
    }
}

/// `numbered_presentation_<yyyyMMdd_HHmmss>.pptx` in the input's directory.
fn default_output_path(input_path: &Path) -> PathBuf {
    let output_filename = format!(
        "numbered_presentation_{}.pptx",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );

    match input_path.parent() {
        Some(parent) => parent.join(output_filename),
        None => PathBuf::from(output_filename),
    }
}

/// Print the slide parts of a presentation and their page numbers.
fn list_slides(input_path: &Path, json: bool) -> Result<()> {
    let file = File::open(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;
    let package = archive::extract(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", input_path.display()))?;
    let slides = locate(&package);

    if json {
        println!("{}", serde_json::to_string_pretty(&slides)?);
    } else {
        for slide in &slides {
            println!("{}\t{}", slide.index, slide.path);
        }
        eprintln!("  Found {} slides", slides.len());
    }

    Ok(())
}
