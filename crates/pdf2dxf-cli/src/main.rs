//! CLI application converting PDF vector illustrations to DXF drawings.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use console::style;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

use pdf2dxf_core::pdf::resolve_program;
use pdf2dxf_core::{ConvertError, Pdf2DxfConfig, PdfAltoExtractor, convert_pdf};

/// Convert vector graphics from a PDF file to a DXF file
#[derive(Parser)]
#[command(name = "pdf2dxf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_parser = existing_file)]
    pdf: PathBuf,

    /// Output DXF file (created or overwritten)
    #[arg(value_parser = absolute_path)]
    dxf: PathBuf,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// pdfalto executable, overriding the config file
    #[arg(long, value_name = "EXE", value_parser = program_path)]
    pdfalto: Option<PathBuf>,
}

fn program_path(arg: &str) -> Result<PathBuf, String> {
    Ok(resolve_program(expand_home(arg)))
}

fn expand_home(arg: &str) -> PathBuf {
    match (arg.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(arg),
    }
}

fn absolute_path(arg: &str) -> Result<PathBuf, String> {
    std::path::absolute(expand_home(arg)).map_err(|e| e.to_string())
}

fn existing_file(arg: &str) -> Result<PathBuf, String> {
    let path = absolute_path(arg)?;
    if !path.is_file() {
        return Err(format!("Missing PDF file {}", path.display()));
    }
    Ok(path)
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pdf2dxf")
        .join("config.json")
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Pdf2DxfConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = default_config_path();
            if !default.is_file() {
                return Ok(Pdf2DxfConfig::default());
            }
            default
        }
    };

    debug!("Loading config from {}", path.display());
    Pdf2DxfConfig::from_file(&path)
        .with_context(|| format!("Failed to load config {}", path.display()))
}

/// Name the boundary a conversion failed at.
fn failure_context(err: &ConvertError) -> &'static str {
    match err {
        ConvertError::Extraction(_) => "PDF extraction failed",
        ConvertError::Metadata(_) => "Reading page metadata failed",
        ConvertError::Vector(_) => "Reading vector file failed",
        ConvertError::Drawing(_) => "Writing drawing failed",
        ConvertError::Io(_) => "I/O error",
        ConvertError::NoIllustrations => "Nothing to convert",
        ConvertError::Config(_) => "Invalid configuration",
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(exe) = cli.pdfalto {
        config.extractor.executable = Some(exe);
    }

    let extractor = PdfAltoExtractor::from_config(&config.extractor);
    debug!("Using extractor {}", extractor.program().display());

    let report = convert_pdf(&extractor, &cli.pdf, &cli.dxf, &config).map_err(|err| {
        let context = failure_context(&err);
        anyhow::Error::new(err).context(context)
    })?;

    println!(
        "{} Wrote {} polylines ({} points) to {}",
        style("✓").green(),
        report.stats.polylines,
        report.stats.points,
        report.output.display()
    );

    Ok(())
}
