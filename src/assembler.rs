/// Merges parsed pages into the final dataset
///
/// Each page covers one (parameter, longitude group) table. Location `i` of the
/// group occupies value slots `2*i` and `2*i + 1` of every row.
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use crate::dataset::{Dataset, LocationTable, ValuePair};
use crate::importers::page_parser::PageTable;
use crate::ocr::page_segmenter::SeasonBlock;
use crate::reference::{Location, LongitudeGroup, PageCoordinate, Parameter};

/// Why a page contributed nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// No text resource for the page
    Missing,
    /// The resource exists but could not be read
    Unreadable(String),
    /// No seasonal blocks could be reconstructed
    Unparseable(String),
    /// Page number outside the table layout
    NoCoordinate,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Missing => write!(f, "page not found"),
            FailureKind::Unreadable(e) => write!(f, "unreadable: {e}"),
            FailureKind::Unparseable(e) => write!(f, "unparseable: {e}"),
            FailureKind::NoCoordinate => write!(f, "no table coordinate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page_num: u32,
    pub kind: FailureKind,
}

/// Result of a batch: best-effort dataset plus the pages that failed
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyOutcome {
    pub dataset: Dataset,
    pub failures: Vec<PageFailure>,
    pub pages_merged: usize,
}

impl AssemblyOutcome {
    /// Non-fatal warning total
    pub fn failed_page_count(&self) -> usize {
        self.failures.len()
    }
}

/// Split the columns of a seasonal block into per-location profiles
///
/// Slots past the end of a row, and absent slots, become `None`.
pub fn expand_block(block: &SeasonBlock, group: &LongitudeGroup) -> Vec<(Location, Vec<ValuePair>)> {
    group
        .locations
        .iter()
        .enumerate()
        .map(|(col, &location)| {
            let pairs = block
                .rows
                .iter()
                .map(|row| {
                    let primary = row.get(col * 2).copied().flatten();
                    let secondary = row.get(col * 2 + 1).copied().flatten();
                    (primary, secondary)
                })
                .collect();
            (location, pairs)
        })
        .collect()
}

/// Single-writer accumulator for the dataset
#[derive(Debug, Default)]
pub struct TableAssembler {
    parameters: BTreeMap<Parameter, LocationTable>,
    failures: Vec<PageFailure>,
    pages_merged: usize,
}

impl TableAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one parsed page; repeated keys are overwritten (last write wins)
    pub fn add_page(&mut self, coordinate: &PageCoordinate, table: &PageTable) {
        let locations = self.parameters.entry(coordinate.parameter).or_default();

        for block in &table.segmentation.blocks {
            for (location, pairs) in expand_block(block, coordinate.group) {
                let previous = locations
                    .entry(location)
                    .or_default()
                    .insert(block.season, pairs);
                if previous.is_some() {
                    warn!(
                        "Page {}: {} {} {} already present, overwriting",
                        table.page_num, coordinate.parameter, location, block.season
                    );
                }
            }
        }

        self.pages_merged += 1;
        debug!(
            "Merged page {} into {} ({} locations)",
            table.page_num,
            coordinate.parameter,
            coordinate.group.column_count()
        );
    }

    pub fn record_failure(&mut self, page_num: u32, kind: FailureKind) {
        warn!("Page {}: {}", page_num, kind);
        self.failures.push(PageFailure { page_num, kind });
    }

    pub fn finish(self) -> AssemblyOutcome {
        AssemblyOutcome {
            dataset: Dataset::from_parameters(self.parameters),
            failures: self.failures,
            pages_merged: self.pages_merged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::page_parser::PageStats;
    use crate::ocr::page_segmenter::{BoundaryStrategy, Segmentation};
    use crate::reference::{PageLayout, Season};

    fn block(season: Season, row: Vec<Option<f64>>) -> SeasonBlock {
        SeasonBlock {
            season,
            rows: vec![row; 9],
        }
    }

    fn table(page_num: u32, blocks: Vec<SeasonBlock>) -> PageTable {
        PageTable {
            page_num,
            expected_values: 0,
            stats: PageStats::default(),
            segmentation: Segmentation {
                blocks,
                strategy: BoundaryStrategy::Boundaries,
                merges: 0,
                truncated_rows: 0,
                padded_rows: 0,
                filler_rows: 0,
            },
        }
    }

    #[test]
    fn test_expand_block_columns() {
        let group = LongitudeGroup::by_label("175E+170W").unwrap();
        let row = vec![
            Some(1.0),
            Some(1.5),
            Some(2.0),
            None,
            None,
            Some(3.5),
            Some(4.0),
            Some(4.5),
        ];
        let expanded = expand_block(&block(Season::Winter, row), group);
        assert_eq!(expanded.len(), 4);
        assert_eq!(expanded[0].0, Location::new(60, 175));
        assert_eq!(expanded[0].1[0], (Some(1.0), Some(1.5)));
        assert_eq!(expanded[1].1[0], (Some(2.0), None));
        assert_eq!(expanded[2].1[0], (None, Some(3.5)));
        assert_eq!(expanded[3].0, Location::new(65, -170));
        assert_eq!(expanded[3].1.len(), 9);
    }

    #[test]
    fn test_expand_block_short_row() {
        let group = LongitudeGroup::by_label("175E+170W").unwrap();
        let expanded = expand_block(&block(Season::Annual, vec![Some(1.0), Some(2.0)]), group);
        assert_eq!(expanded[1].1[0], (None, None));
    }

    #[test]
    fn test_add_page_and_finish() {
        let layout = PageLayout::default();
        let coord = layout.coordinate(20).unwrap(); // temperature, 175E+170W
        let row = vec![Some(250.0), Some(5.0)]
            .into_iter()
            .cycle()
            .take(8)
            .collect::<Vec<_>>();
        let blocks = Season::ALL.iter().map(|&s| block(s, row.clone())).collect();

        let mut assembler = TableAssembler::new();
        assembler.add_page(&coord, &table(20, blocks));
        assembler.record_failure(21, FailureKind::Missing);
        let outcome = assembler.finish();

        assert_eq!(outcome.pages_merged, 1);
        assert_eq!(outcome.failed_page_count(), 1);
        let temps = outcome.dataset.parameter(Parameter::Temperature).unwrap();
        assert_eq!(temps.len(), 4);
        assert_eq!(temps[&Location::new(65, -170)].len(), 5);
        assert!(outcome.dataset.parameter(Parameter::Pressure).is_none());
    }

    #[test]
    fn test_duplicate_page_last_write_wins() {
        let coord = PageLayout::default().coordinate(20).unwrap();
        let first = table(20, vec![block(Season::Winter, vec![Some(1.0); 8])]);
        let second = table(20, vec![block(Season::Winter, vec![Some(2.0); 8])]);

        let mut assembler = TableAssembler::new();
        assembler.add_page(&coord, &first);
        assembler.add_page(&coord, &second);
        let outcome = assembler.finish();

        let s = outcome
            .dataset
            .series(Parameter::Temperature, Location::new(60, 175), Season::Winter)
            .unwrap();
        assert_eq!(s[0], (Some(2.0), Some(2.0)));
        assert_eq!(outcome.pages_merged, 2);
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::Missing.to_string(), "page not found");
        assert_eq!(
            FailureKind::Unparseable("x".into()).to_string(),
            "unparseable: x"
        );
    }
}
