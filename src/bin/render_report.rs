use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use pdi_report::model::Dataset;
use pdi_report::report::{Analysis, ReportBuilder};

#[derive(Parser, Debug)]
#[command(name = "render-report")]
#[command(about = "Render the strategic development plan report as a PDF", long_about = None)]
struct Args {
    /// Path to the indicator dataset (JSON). Without it, the bundled example data is used.
    #[arg(value_name = "DATASET")]
    dataset: Option<PathBuf>,

    /// Path of the PDF file to write.
    #[arg(short, long, default_value = "informe_estrategico.pdf")]
    output: PathBuf,

    /// Report year. Defaults to the latest year in the dataset.
    #[arg(long)]
    year: Option<i32>,

    /// Path to a JSON file with narrative analysis texts.
    #[arg(long)]
    analysis: Option<PathBuf>,

    /// Path to a cover image (PNG or JPEG).
    #[cfg(feature = "images")]
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = match &args.dataset {
        Some(path) => Dataset::load(path)?,
        None => {
            info!("no dataset given, using the bundled example data");
            Dataset::sample()
        }
    };

    let mut builder = ReportBuilder::new(dataset);
    if let Some(year) = args.year {
        builder = builder.with_year(year);
    }
    if let Some(path) = &args.analysis {
        builder = builder.with_analysis(Analysis::load(path)?);
    }
    #[cfg(feature = "images")]
    if let Some(path) = &args.cover {
        builder = builder.with_cover_image(std::fs::read(path)?);
    }

    let report = builder.build()?;
    info!("writing {} pages to {}", report.page_count(), args.output.display());
    report.write_to_file(&args.output)?;
    println!("Informe generado: {}", args.output.display());
    Ok(())
}
