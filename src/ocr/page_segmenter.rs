/// Seasonal segmentation of a page's data rows
///
/// Each season restarts the height sequence at 10 m, so rows at the boundary
/// height mark where a seasonal block begins. A page normally has five of them.
use thiserror::Error;
use tracing::{debug, warn};

use crate::ocr::row_extractor::DataRow;
use crate::reference::{Season, BOUNDARY_HEIGHT, ROWS_PER_PAGE, ROWS_PER_SEASON};

#[derive(Error, Debug, PartialEq)]
pub enum SegmentError {
    #[error("No season boundary rows among {rows} data rows")]
    NoBoundaries { rows: usize },
}

/// How the season boundaries of a page were decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryStrategy {
    /// Exactly five boundary rows were found
    Boundaries,
    /// Boundary count was wrong; rows were cut into fixed groups of nine
    FixedPartition { boundaries_found: usize },
    /// Too few rows for the fixed partition; whatever boundaries exist were used
    Salvaged { boundaries_found: usize },
}

/// Nine rows of one season, each with the page's expected value count
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonBlock {
    pub season: Season,
    pub rows: Vec<Vec<Option<f64>>>,
}

/// Segmented page plus repair statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub blocks: Vec<SeasonBlock>,
    pub strategy: BoundaryStrategy,
    /// Split decimals merged back together across all rows
    pub merges: usize,
    /// Rows that still had excess values after repair
    pub truncated_rows: usize,
    /// Rows padded with absent values at the end
    pub padded_rows: usize,
    /// Fully-absent rows added to complete short blocks
    pub filler_rows: usize,
}

impl Segmentation {
    pub fn seasons(&self) -> Vec<Season> {
        self.blocks.iter().map(|b| b.season).collect()
    }

    pub fn block(&self, season: Season) -> Option<&SeasonBlock> {
        self.blocks.iter().find(|b| b.season == season)
    }
}

/// Positions of rows at the boundary height
pub fn boundary_positions(rows: &[DataRow]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.height == BOUNDARY_HEIGHT)
        .map(|(i, _)| i)
        .collect()
}

/// Partition a page's rows into seasonal blocks of nine rows
///
/// With exactly five boundary rows each block runs from its boundary to the
/// next one (the last block to the end of the rows), clipped to nine rows.
/// Otherwise pages with at least 45 rows are cut into five fixed groups of
/// nine; shorter pages fall back to the boundaries that were found, which may
/// produce fewer than five seasons. Every block is padded to nine rows.
pub fn segment_page(rows: &[DataRow], expected_values: usize) -> Result<Segmentation, SegmentError> {
    let season_count = Season::ALL.len();
    let found = boundary_positions(rows);

    let (starts, strategy) = if found.len() == season_count {
        (found, BoundaryStrategy::Boundaries)
    } else if rows.len() >= ROWS_PER_PAGE {
        debug!(
            "Found {} season boundaries, using fixed partition of {} rows",
            found.len(),
            rows.len()
        );
        let fixed = (0..season_count).map(|i| i * ROWS_PER_SEASON).collect();
        (
            fixed,
            BoundaryStrategy::FixedPartition {
                boundaries_found: found.len(),
            },
        )
    } else {
        warn!(
            "Found {} season starts (expected {}), {} total rows",
            found.len(),
            season_count,
            rows.len()
        );
        if found.is_empty() {
            return Err(SegmentError::NoBoundaries { rows: rows.len() });
        }
        let boundaries_found = found.len();
        (found, BoundaryStrategy::Salvaged { boundaries_found })
    };

    let mut segmentation = Segmentation {
        blocks: Vec::with_capacity(season_count),
        strategy,
        merges: 0,
        truncated_rows: 0,
        padded_rows: 0,
        filler_rows: 0,
    };

    for (block_idx, &start) in starts.iter().enumerate().take(season_count) {
        let Some(season) = Season::from_block_index(block_idx) else {
            break;
        };

        let end = match starts.get(block_idx + 1) {
            Some(&next) => next,
            None => (start + ROWS_PER_SEASON).min(rows.len()),
        };
        let end = end.min(start + ROWS_PER_SEASON);

        let mut block_rows = Vec::with_capacity(ROWS_PER_SEASON);
        for row in rows.get(start..end).unwrap_or_default() {
            let fitted = row.fit_to(expected_values);
            segmentation.merges += fitted.merges;
            if fitted.truncated > 0 {
                segmentation.truncated_rows += 1;
            }
            if fitted.padded > 0 {
                segmentation.padded_rows += 1;
            }
            block_rows.push(fitted.values);
        }

        while block_rows.len() < ROWS_PER_SEASON {
            block_rows.push(vec![None; expected_values]);
            segmentation.filler_rows += 1;
        }

        segmentation.blocks.push(SeasonBlock {
            season,
            rows: block_rows,
        });
    }

    Ok(segmentation)
}
