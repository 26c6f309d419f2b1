//! CLI tool for converting Google Docs JSON exports into Slides requests.

mod summary;

use anyhow::{Context, Result};
use clap::Parser;
use docslides_core::{ConversionConfig, ConversionReport, Converter, SourceReader};
use docslides_gdocs::DocsJsonReader;
use docslides_slides::{BatchRecorder, RecordedPresentation};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Convert Google Docs JSON exports into Google Slides batchUpdate requests.
#[derive(Parser, Debug)]
#[command(name = "docs2slides")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input Docs JSON file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Conversion settings as JSON; missing keys keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum words per text slide
    #[arg(long)]
    max_words: Option<usize>,

    /// Maximum lines per text slide
    #[arg(long)]
    max_lines: Option<usize>,

    /// Do not create a title slide for every section
    #[arg(long)]
    no_section_slides: bool,

    /// Presentation title (default: the document title)
    #[arg(short, long)]
    title: Option<String>,

    /// Do not append the creation time to the presentation title
    #[arg(long)]
    no_timestamp: bool,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print requests to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// Print the document structure breakdown
    #[arg(short, long)]
    summary: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// What gets written for one converted document.
#[derive(Serialize)]
struct ConversionOutput {
    report: ConversionReport,
    presentation: RecordedPresentation,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = load_config(&args)?;
    let converter = Converter::new(config).context("Invalid conversion settings")?;
    let reader = DocsJsonReader::new();

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &args, &converter, &reader) {
            Ok(output) => {
                if args.print {
                    println!("{}", output);
                } else {
                    let output_path = get_output_path(input_path, args.output.as_ref())?;
                    write_output(&output_path, &output)?;
                    if args.verbose {
                        eprintln!("Written to: {}", output_path.display());
                    }
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    Ok(())
}

/// Defaults, then the config file, then command line overrides.
fn load_config(args: &Args) -> Result<ConversionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => ConversionConfig::default(),
    };

    if let Some(words) = args.max_words {
        config.pagination.max_words_per_chunk = words;
    }
    if let Some(lines) = args.max_lines {
        config.pagination.max_lines_per_chunk = lines;
    }
    if args.no_section_slides {
        config.pagination.section_title_slides = false;
    }

    log::debug!("Conversion settings: {:?}", config);
    Ok(config)
}

/// Convert a single Docs JSON file and return the serialized requests.
fn process_file(
    input_path: &Path,
    args: &Args,
    converter: &Converter,
    reader: &DocsJsonReader,
) -> Result<String> {
    let handle = input_path.to_string_lossy();
    let document = reader
        .fetch(&handle)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    let extraction = converter.extract(&document).map_err(stage_error)?;
    if args.summary {
        println!("{}", summary::structure_breakdown(&extraction.elements));
    }

    let base_title = args.title.as_deref().unwrap_or(document.title.as_str());
    let title = presentation_title(base_title, !args.no_timestamp);

    let mut recorder = BatchRecorder::new();
    let report = converter
        .convert_extraction(&document, extraction, Some(&title), &mut recorder, None)
        .map_err(stage_error)?;

    if args.verbose {
        eprintln!(
            "  {} elements, {} slides, {} skipped",
            report.element_count,
            report.slide_count,
            report.skipped.len()
        );
    }
    for skipped in &report.skipped {
        eprintln!("  Skipped {}: {}", skipped.element, skipped.reason);
    }

    let presentation = recorder
        .into_presentation()
        .ok_or_else(|| anyhow::anyhow!("No presentation was recorded"))?;
    let output = ConversionOutput {
        report,
        presentation,
    };

    serde_json::to_string_pretty(&output).context("Failed to serialize requests")
}

fn stage_error(error: docslides_core::Error) -> anyhow::Error {
    let stage = error.stage();
    anyhow::Error::new(error).context(format!("Conversion failed at the {} stage", stage))
}

/// Title with an optional `yyyy-MM-dd HH:mm` local timestamp.
fn presentation_title(base: &str, timestamp: bool) -> String {
    if timestamp {
        format!("{} - {}", base, chrono::Local::now().format("%Y-%m-%d %H:%M"))
    } else {
        base.to_string()
    }
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.slides.json", stem);

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
