// Synthetic OCR page dumps shared by the integration tests
#![allow(dead_code)]

use gost_boundary_layer::importers::InMemoryPageSource;
use gost_boundary_layer::reference::{PageCoordinate, PageLayout, Parameter, Season, HEIGHTS};
use gost_boundary_layer::validation::known_missing_annual;

const SEASON_LABELS: [&str; 5] = ["Зима", "Весна", "Лето", "Осень", "Год"];

fn tenths(value: u32) -> String {
    format!("{}.{}", value / 10, value % 10)
}

/// Text of the (primary, secondary) cell for one location of a row
pub fn cell(parameter: Parameter, column: usize, season: usize, height_idx: usize) -> (String, String) {
    let p = Parameter::ALL.iter().position(|x| *x == parameter).unwrap_or(0) as u32;
    let primary = 1000 + 100 * p + 10 * column as u32 + 2 * season as u32 + height_idx as u32;
    let secondary = 10 + 3 * column as u32 + season as u32;
    (tenths(primary), tenths(secondary))
}

/// Value pair the cell is expected to parse into
pub fn expected_pair(
    parameter: Parameter,
    column: usize,
    season: usize,
    height_idx: usize,
) -> (Option<f64>, Option<f64>) {
    let (a, b) = cell(parameter, column, season, height_idx);
    (a.parse().ok(), b.parse().ok())
}

/// One data row as it appears in a page dump
pub fn row_line(coordinate: &PageCoordinate, season: usize, height_idx: usize) -> String {
    let mut parts = vec![HEIGHTS[height_idx].to_string()];
    for column in 0..coordinate.group.column_count() {
        let (a, b) = cell(coordinate.parameter, column, season, height_idx);
        parts.push(a);
        parts.push(b);
    }
    parts.join("  ")
}

/// Page dump with a header, season captions and `seasons` blocks of nine rows
pub fn page_lines(coordinate: &PageCoordinate, seasons: usize) -> Vec<String> {
    let mut lines = vec![
        format!("Таблица {} - {}", coordinate.table_number, coordinate.parameter.description()),
        format!("Долгота {}", coordinate.group.label),
        "Высота, м".to_string(),
    ];
    for season in 0..seasons {
        lines.push(SEASON_LABELS[season].to_string());
        for height_idx in 0..HEIGHTS.len() {
            lines.push(row_line(coordinate, season, height_idx));
        }
    }
    lines.push(format!("Продолжение таблицы {}", coordinate.table_number));
    lines
}

pub fn page_text(coordinate: &PageCoordinate, seasons: usize) -> String {
    page_lines(coordinate, seasons).join("\n")
}

/// Same text with `N→` line-number markers, as produced by a numbered dump
pub fn numbered(text: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| format!("{:6}→{}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether the source table for this page lacks its annual block
pub fn lacks_annual(coordinate: &PageCoordinate) -> bool {
    let known = known_missing_annual();
    coordinate
        .group
        .locations
        .iter()
        .all(|loc| known.contains(&(coordinate.parameter, *loc)))
}

/// All 108 pages, with the annual block dropped where the source lacks it
pub fn full_source(layout: &PageLayout) -> InMemoryPageSource {
    let mut source = InMemoryPageSource::new();
    for page_num in layout.pages() {
        if let Some(coordinate) = layout.coordinate(page_num) {
            let seasons = if lacks_annual(&coordinate) {
                Season::ALL.len() - 1
            } else {
                Season::ALL.len()
            };
            source.insert(page_num, page_text(&coordinate, seasons));
        }
    }
    source
}
