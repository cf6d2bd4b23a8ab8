//! tiffmerge CLI - batch TIFF to merged PDF conversion tool

use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::Colorize;

use tiffmerge::{run_batch, BatchManifest, BatchOptions, BatchReport, DeletePolicy, FailurePolicy};

#[derive(Parser)]
#[command(name = "tiffmerge")]
#[command(version)]
#[command(about = "Convert a batch of TIFF scans into a single merged PDF", long_about = None)]
struct Cli {
    /// Job identifier used to name the merged output
    #[arg(value_name = "JOB_ID")]
    job_id: String,

    /// File names authorized for this batch
    #[arg(value_name = "FILES")]
    files: Vec<String>,

    /// Directory scanned for source TIFF files
    #[arg(long, value_name = "DIR", default_value = "pdf/input")]
    input_dir: PathBuf,

    /// Directory receiving the merged PDF
    #[arg(long, value_name = "DIR", default_value = "pdf/output")]
    output_dir: PathBuf,

    /// Skip files that fail conversion instead of aborting the batch
    #[arg(long)]
    skip_failed: bool,

    /// Delete only sources that were successfully converted
    #[arg(long, conflicts_with = "keep_sources")]
    only_converted: bool,

    /// Keep all source files after merging
    #[arg(long)]
    keep_sources: bool,

    /// Print the batch report as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.json {
        println!("{}", "~~~> Launching TIFF to PDF converter.".cyan());
    }

    let manifest = BatchManifest::new(&cli.job_id, cli.files.iter().cloned());

    let mut options = BatchOptions::new();
    if cli.skip_failed {
        options = options.with_failure_policy(FailurePolicy::Skip);
    }
    if cli.keep_sources {
        options = options.with_delete_policy(DeletePolicy::Keep);
    } else if cli.only_converted {
        options = options.with_delete_policy(DeletePolicy::OnlyConverted);
    }

    let report = run_batch(&cli.input_dir, &manifest, &cli.output_dir, &options)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &BatchReport) {
    println!(
        "{} {}",
        "Merged output:".green().bold(),
        report.output_path.display()
    );
    println!("  {} file(s) converted and merged", report.converted.len());
    if !report.skipped.is_empty() {
        println!(
            "  {}",
            format!("{} file(s) skipped after conversion failure", report.skipped.len()).yellow()
        );
    }
    if !report.deleted_sources.is_empty() {
        println!("  {} source file(s) removed", report.deleted_sources.len());
    }
    println!(
        "{}",
        "~~~> Closing TIFF to PDF converter. Merge success!".cyan()
    );
}
