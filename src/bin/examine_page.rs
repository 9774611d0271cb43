/// Dump how one OCR page is classified, extracted and segmented
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use gost_boundary_layer::importers::page_parser::{collect_rows, parse_page_text};
use gost_boundary_layer::importers::{DirectoryPageSource, PageSource};
use gost_boundary_layer::ocr::is_data_line;
use gost_boundary_layer::ocr::page_segmenter::boundary_positions;
use gost_boundary_layer::reference::{PageLayout, HEIGHTS};
use gost_boundary_layer::utils::{strip_line_prefix, text_lines};

#[derive(Parser)]
#[command(name = "examine-page")]
#[command(about = "Show classifier, extractor and segmenter output for one page", long_about = None)]
struct Cli {
    /// Page number (e.g. 9 for table 1)
    page: u32,

    /// Directory holding page_NNN.txt dumps
    #[arg(long, env, default_value = "pages")]
    pages_dir: PathBuf,

    /// Also print rejected lines
    #[arg(long)]
    all_lines: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let layout = PageLayout::default();
    let coordinate = layout
        .coordinate(cli.page)
        .ok_or_else(|| format!("Page {} is not a data page", cli.page))?;

    let source = DirectoryPageSource::new(&cli.pages_dir);
    println!("Opening page file: {}", source.page_path(cli.page).display());
    let text = source
        .read_page(cli.page)?
        .ok_or_else(|| format!("Page {} not found", cli.page))?;

    println!(
        "Table {}: {} / {} ({} locations, {} values per row)",
        coordinate.table_number,
        coordinate.parameter,
        coordinate.group.label,
        coordinate.group.column_count(),
        coordinate.group.values_per_row()
    );

    println!("\nLines:");
    println!("{}", "=".repeat(100));
    for (idx, raw_line) in text_lines(&text).enumerate() {
        let line = strip_line_prefix(raw_line.trim());
        let accepted = is_data_line(line);
        if accepted || cli.all_lines {
            let marker = if accepted { "DATA" } else { "    " };
            println!("{:4} {marker} {line}", idx + 1);
        }
    }

    let page = collect_rows(&text);
    let boundaries = boundary_positions(&page.rows);
    println!("\n{}", "=".repeat(100));
    println!("Stats: {:?}", page.stats);
    println!("Boundary rows at: {boundaries:?}");

    match parse_page_text(cli.page, &text, coordinate.group.values_per_row()) {
        Ok(table) => {
            let seg = &table.segmentation;
            println!(
                "Strategy: {:?}, merges: {}, truncated rows: {}, padded rows: {}, filler rows: {}",
                seg.strategy, seg.merges, seg.truncated_rows, seg.padded_rows, seg.filler_rows
            );
            for block in &seg.blocks {
                println!("\n[{}]", block.season);
                for (h, row) in HEIGHTS.iter().zip(&block.rows) {
                    let cells: Vec<String> = row
                        .iter()
                        .map(|v| v.map_or("-".to_string(), |x| x.to_string()))
                        .collect();
                    println!("  {h:5}: {}", cells.join(" "));
                }
            }
        }
        Err(e) => println!("Segmentation failed: {e}"),
    }

    Ok(())
}
