use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gost_boundary_layer::config::Config;
use gost_boundary_layer::export::write_json;
use gost_boundary_layer::importers::DirectoryPageSource;
use gost_boundary_layer::reference::{Location, PageLayout, Parameter, Season, HEIGHTS};
use gost_boundary_layer::services::{DigitizeService, PageEvent};
use gost_boundary_layer::validation::{check_structure, ValidationSummary};

#[derive(Parser)]
#[command(name = "gost-digitize")]
#[command(about = "Rebuild the GOST R 54084-2010 tables from OCR page dumps", long_about = None)]
struct Cli {
    /// Directory holding page_NNN.txt dumps
    #[arg(long, env)]
    pages_dir: Option<PathBuf>,

    /// Path of the JSON export
    #[arg(long, env)]
    output_path: Option<PathBuf>,

    /// First data page (table 1); FIRST_DATA_PAGE is read by the config
    #[arg(long)]
    first_data_page: Option<u32>,

    /// Last data page; LAST_DATA_PAGE is read by the config
    #[arg(long)]
    last_data_page: Option<u32>,

    /// Parse and report without writing the export
    #[arg(long)]
    dry_run: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

/// Command-line values take precedence over the environment config
fn resolve_config(cli: &Cli, defaults: Config) -> Config {
    Config {
        pages_dir: cli.pages_dir.clone().unwrap_or(defaults.pages_dir),
        output_path: cli.output_path.clone().unwrap_or(defaults.output_path),
        first_data_page: cli.first_data_page.unwrap_or(defaults.first_data_page),
        last_data_page: cli.last_data_page.unwrap_or(defaults.last_data_page),
    }
}

fn rule() -> String {
    "=".repeat(70)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gost_boundary_layer=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli, Config::from_env());
    info!("Starting digitizer with config: {:?}", config);

    let layout: PageLayout = config.page_layout();

    println!("{}", rule());
    println!("Parsing GOST R 54084-2010 data tables");
    println!("{}", rule());

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(layout.page_count() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let parse_start = Instant::now();
    let service = DigitizeService::new(DirectoryPageSource::new(&config.pages_dir), layout);
    let outcome = service.build_dataset_with(|event| {
        match event {
            PageEvent::Parsed { page_num, .. } => pb.set_message(format!("page {page_num}")),
            PageEvent::Failed { page_num, kind } => {
                pb.set_message(format!("page {page_num} failed: {kind}"))
            }
        }
        pb.inc(1);
    });
    let parse_duration = parse_start.elapsed();
    pb.finish_with_message(format!("✓ Merged {} pages", outcome.pages_merged));

    let summary = ValidationSummary::new(&outcome.dataset, outcome.failed_page_count());
    println!("\n{}", rule());
    println!("Validation Summary");
    println!("{}", rule());
    println!("{summary}");

    let structure = check_structure(&outcome.dataset);
    println!("\n{}", rule());
    println!("Structure Check");
    println!("{}", rule());
    if structure.is_ok() {
        println!("  ✓ 73 locations per parameter, expected seasons, 9 levels per series");
    } else {
        for issue in structure.issues.iter().take(20) {
            println!("  {issue}");
        }
        if structure.issues.len() > 20 {
            println!("  ... ({} more) ...", structure.issues.len() - 20);
        }
    }
    println!("  Single-slot gaps: {}", structure.single_slot_gaps);

    if !outcome.failures.is_empty() {
        println!("\nFailed pages:");
        for failure in &outcome.failures {
            println!("  {:3}: {}", failure.page_num, failure.kind);
        }
    }

    if cli.dry_run {
        println!("\nDry run: export not written");
    } else {
        write_json(&outcome.dataset, &config.output_path)?;
        println!("\nOutput written to: {}", config.output_path.display());
    }

    println!("\n{}", rule());
    println!("Sample: Temperature at 55°N, 30°E (winter)");
    println!("{}", rule());
    let sample = outcome
        .dataset
        .series(Parameter::Temperature, Location::new(55, 30), Season::Winter);
    match sample {
        Some(profile) => {
            for (h, (t, sigma_t)) in HEIGHTS.iter().zip(profile) {
                let t_str = t.map_or("N/A".to_string(), |v| format!("{v:.1}"));
                let s_str = sigma_t.map_or("N/A".to_string(), |v| format!("{v:.1}"));
                println!("  {h:5} m: T = {t_str} K, σT = {s_str} K");
            }
        }
        None => println!("  (no data)"),
    }

    println!("{}", "-".repeat(70));
    println!("Parse Time:         {:.2}s", parse_duration.as_secs_f64());

    Ok(())
}
