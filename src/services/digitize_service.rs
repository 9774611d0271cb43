use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::assembler::{AssemblyOutcome, FailureKind, TableAssembler};
use crate::importers::page_parser::{parse_page_text, PageTable};
use crate::importers::page_source::PageSource;
use crate::reference::PageLayout;

/// Outcome of one page, reported to the batch observer
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Parsed {
        page_num: u32,
        seasons: usize,
        rows: usize,
    },
    Failed {
        page_num: u32,
        kind: FailureKind,
    },
}

impl PageEvent {
    pub fn page_num(&self) -> u32 {
        match self {
            PageEvent::Parsed { page_num, .. } | PageEvent::Failed { page_num, .. } => *page_num,
        }
    }
}

/// Batch driver: pages in increasing order, one at a time
///
/// Failures stay local to their page; the batch always completes.
pub struct DigitizeService<S: PageSource> {
    source: S,
    layout: PageLayout,
}

impl<S: PageSource> DigitizeService<S> {
    pub fn new(source: S, layout: PageLayout) -> Self {
        Self { source, layout }
    }

    /// Read and parse a single page for its table coordinate
    pub fn parse_page(&self, page_num: u32) -> Result<PageTable, FailureKind> {
        let coordinate = self
            .layout
            .coordinate(page_num)
            .ok_or(FailureKind::NoCoordinate)?;

        let text = self
            .source
            .read_page(page_num)
            .map_err(|e| FailureKind::Unreadable(e.to_string()))?
            .ok_or(FailureKind::Missing)?;

        parse_page_text(page_num, &text, coordinate.group.values_per_row())
            .map_err(|e| FailureKind::Unparseable(e.to_string()))
    }

    pub fn build_dataset(&self) -> AssemblyOutcome {
        self.build_dataset_with(|_| {})
    }

    /// Build the dataset, notifying `observer` after every page
    #[instrument(skip(self, observer), fields(first = self.layout.first_page, last = self.layout.last_page))]
    pub fn build_dataset_with<F>(&self, mut observer: F) -> AssemblyOutcome
    where
        F: FnMut(&PageEvent),
    {
        let start_time = Instant::now();
        let mut assembler = TableAssembler::new();

        for page_num in self.layout.pages() {
            let Some(coordinate) = self.layout.coordinate(page_num) else {
                assembler.record_failure(page_num, FailureKind::NoCoordinate);
                observer(&PageEvent::Failed {
                    page_num,
                    kind: FailureKind::NoCoordinate,
                });
                continue;
            };

            info!(
                "Page {:3}: Table {:3} - {:<30} lon_idx={:2}, {} locations",
                page_num,
                coordinate.table_number,
                coordinate.parameter.name(),
                coordinate.group.index,
                coordinate.group.column_count()
            );

            match self.parse_page(page_num) {
                Ok(table) => {
                    assembler.add_page(&coordinate, &table);
                    observer(&PageEvent::Parsed {
                        page_num,
                        seasons: table.segmentation.blocks.len(),
                        rows: table.stats.rows,
                    });
                }
                Err(kind) => {
                    assembler.record_failure(page_num, kind.clone());
                    observer(&PageEvent::Failed { page_num, kind });
                }
            }
        }

        let outcome = assembler.finish();
        if outcome.failed_page_count() > 0 {
            warn!(
                "{} of {} pages failed",
                outcome.failed_page_count(),
                self.layout.page_count()
            );
        }
        info!(
            "Merged {} pages in {:.2}s",
            outcome.pages_merged,
            start_time.elapsed().as_secs_f64()
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::page_source::InMemoryPageSource;
    use crate::reference::{Location, Parameter, Season, HEIGHTS};

    fn page(values_per_row: usize) -> String {
        let mut text = String::new();
        for _ in Season::ALL {
            for h in HEIGHTS {
                let values: Vec<String> = (0..values_per_row).map(|i| format!("{i}.5")).collect();
                text.push_str(&format!("{h} {}\n", values.join(" ")));
            }
        }
        text
    }

    #[test]
    fn test_missing_pages_counted() {
        // only page 9 (temperature, 20E+30E) exists
        let source = InMemoryPageSource::new().with_page(9, page(14));
        let service = DigitizeService::new(source, PageLayout::new(9, 11));

        let mut events = Vec::new();
        let outcome = service.build_dataset_with(|e| events.push(e.clone()));

        assert_eq!(outcome.pages_merged, 1);
        assert_eq!(outcome.failed_page_count(), 2);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].page_num(), 9);
        assert!(matches!(
            events[1],
            PageEvent::Failed {
                page_num: 10,
                kind: FailureKind::Missing
            }
        ));

        let s = outcome
            .dataset
            .series(Parameter::Temperature, Location::new(70, 30), Season::Annual)
            .unwrap();
        assert_eq!(s.len(), 9);
        assert_eq!(s[0], (Some(12.5), Some(13.5)));
    }

    #[test]
    fn test_unparseable_page_counted() {
        let source = InMemoryPageSource::new().with_page(9, "Содержание\n");
        let service = DigitizeService::new(source, PageLayout::new(9, 9));
        let outcome = service.build_dataset();
        assert!(outcome.dataset.is_empty());
        assert!(matches!(
            outcome.failures[0].kind,
            FailureKind::Unparseable(_)
        ));
    }

    #[test]
    fn test_page_outside_table_grid() {
        let service = DigitizeService::new(InMemoryPageSource::new(), PageLayout::new(9, 200));
        assert_eq!(service.parse_page(117), Err(FailureKind::NoCoordinate));
        assert_eq!(service.parse_page(9), Err(FailureKind::Missing));
    }
}
