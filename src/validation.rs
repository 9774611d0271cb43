/// Validation summary and structural checks of an assembled dataset
///
/// These checks cover shape only (locations, seasons, series length). Physical
/// plausibility of the values is left to downstream consumers.
use std::collections::BTreeSet;
use std::fmt;

use crate::dataset::{Dataset, ValuePair};
use crate::reference::{
    all_locations, Location, LongitudeGroup, Parameter, Season, HEIGHTS,
};

/// (parameter, longitude group) tables whose annual block is absent in the source
const KNOWN_MISSING_ANNUAL_TABLES: [(Parameter, &str); 2] = [
    (Parameter::Pressure, "135E"),
    (Parameter::MeridionalWindSpeed, "60E"),
];

/// (parameter, location) pairs expected to carry only the four calendar seasons
pub fn known_missing_annual() -> BTreeSet<(Parameter, Location)> {
    KNOWN_MISSING_ANNUAL_TABLES
        .iter()
        .filter_map(|(parameter, label)| {
            LongitudeGroup::by_label(label).map(|group| (*parameter, group))
        })
        .flat_map(|(parameter, group)| group.locations.iter().map(move |&loc| (parameter, loc)))
        .collect()
}

fn is_missing(pair: &ValuePair) -> bool {
    pair.0.is_none() || pair.1.is_none()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSummary {
    pub parameter: Parameter,
    pub locations: usize,
    pub points: usize,
    pub missing: usize,
}

fn percent_ok(points: usize, missing: usize) -> f64 {
    (points - missing) as f64 / points.max(1) as f64 * 100.0
}

impl ParameterSummary {
    pub fn percent_ok(&self) -> f64 {
        percent_ok(self.points, self.missing)
    }
}

/// Point and gap tallies per parameter, plus the batch failure count
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSummary {
    pub parameters: Vec<ParameterSummary>,
    pub total_points: usize,
    pub total_missing: usize,
    pub failed_pages: usize,
}

impl ValidationSummary {
    pub fn new(dataset: &Dataset, failed_pages: usize) -> Self {
        let parameters: Vec<ParameterSummary> = dataset
            .parameters()
            .map(|(parameter, table)| {
                let pairs = table
                    .values()
                    .flat_map(|series| series.values())
                    .flat_map(|pairs| pairs.iter());
                let (points, missing) = pairs.fold((0, 0), |(points, missing), pair| {
                    (points + 1, missing + usize::from(is_missing(pair)))
                });
                ParameterSummary {
                    parameter,
                    locations: table.len(),
                    points,
                    missing,
                }
            })
            .collect();

        let total_points = parameters.iter().map(|p| p.points).sum();
        let total_missing = parameters.iter().map(|p| p.missing).sum();

        Self {
            parameters,
            total_points,
            total_missing,
            failed_pages,
        }
    }

    pub fn percent_ok(&self) -> f64 {
        percent_ok(self.total_points, self.total_missing)
    }
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.parameters {
            writeln!(
                f,
                "  {:<35}: {:3} locs, {:6} points, {:4} None ({:.1}% OK)",
                p.parameter.name(),
                p.locations,
                p.points,
                p.missing,
                p.percent_ok()
            )?;
        }
        writeln!(
            f,
            "\n  TOTAL: {} data points, {} None ({:.1}% OK)",
            self.total_points,
            self.total_missing,
            self.percent_ok()
        )?;
        write!(f, "  Failed pages: {}", self.failed_pages)
    }
}

/// A deviation from the expected dataset shape
#[derive(Debug, Clone, PartialEq)]
pub enum StructureIssue {
    ParameterMissing(Parameter),
    LocationSet {
        parameter: Parameter,
        missing: Vec<Location>,
        unexpected: Vec<Location>,
    },
    SeasonSet {
        parameter: Parameter,
        location: Location,
        expected: Vec<Season>,
        actual: Vec<Season>,
    },
    SeriesLength {
        parameter: Parameter,
        location: Location,
        season: Season,
        len: usize,
    },
}

impl fmt::Display for StructureIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureIssue::ParameterMissing(p) => write!(f, "{p}: no data"),
            StructureIssue::LocationSet {
                parameter,
                missing,
                unexpected,
            } => write!(
                f,
                "{parameter}: {} locations missing, {} unexpected",
                missing.len(),
                unexpected.len()
            ),
            StructureIssue::SeasonSet {
                parameter,
                location,
                expected,
                actual,
            } => write!(
                f,
                "{parameter} ({location}): expected {} seasons, found {:?}",
                expected.len(),
                actual
            ),
            StructureIssue::SeriesLength {
                parameter,
                location,
                season,
                len,
            } => write!(
                f,
                "{parameter} ({location}) {season}: {len} values, expected {}",
                HEIGHTS.len()
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureReport {
    pub issues: Vec<StructureIssue>,
    /// Pairs with exactly one absent slot
    pub single_slot_gaps: usize,
}

impl StructureReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check every parameter against the 73-location grid, the season sets
/// (allowing the known annual gaps) and the nine-level series length
pub fn check_structure(dataset: &Dataset) -> StructureReport {
    let expected_locations = all_locations();
    let missing_annual = known_missing_annual();
    let mut report = StructureReport::default();

    for parameter in Parameter::ALL {
        let Some(table) = dataset.parameter(parameter) else {
            report.issues.push(StructureIssue::ParameterMissing(parameter));
            continue;
        };

        let actual: BTreeSet<Location> = table.keys().copied().collect();
        if actual != expected_locations {
            report.issues.push(StructureIssue::LocationSet {
                parameter,
                missing: expected_locations.difference(&actual).copied().collect(),
                unexpected: actual.difference(&expected_locations).copied().collect(),
            });
        }

        for (&location, series) in table {
            let expected: Vec<Season> = if missing_annual.contains(&(parameter, location)) {
                Season::ALL
                    .into_iter()
                    .filter(|s| *s != Season::Annual)
                    .collect()
            } else {
                Season::ALL.to_vec()
            };
            let seasons: Vec<Season> = series.keys().copied().collect();
            if seasons != expected {
                report.issues.push(StructureIssue::SeasonSet {
                    parameter,
                    location,
                    expected,
                    actual: seasons,
                });
            }

            for (&season, pairs) in series {
                if pairs.len() != HEIGHTS.len() {
                    report.issues.push(StructureIssue::SeriesLength {
                        parameter,
                        location,
                        season,
                        len: pairs.len(),
                    });
                }
                report.single_slot_gaps += pairs
                    .iter()
                    .filter(|(a, b)| a.is_none() != b.is_none())
                    .count();
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_missing_annual_has_13_pairs() {
        let known = known_missing_annual();
        assert_eq!(known.len(), 13);
        assert!(known.contains(&(Parameter::Pressure, Location::new(45, 135))));
        assert!(known.contains(&(Parameter::MeridionalWindSpeed, Location::new(40, 60))));
        assert!(!known.contains(&(Parameter::Temperature, Location::new(40, 60))));
    }

    #[test]
    fn test_empty_dataset_reports_every_parameter() {
        let report = check_structure(&Dataset::default());
        assert_eq!(report.issues.len(), 9);
        assert!(!report.is_ok());
        assert_eq!(
            report.issues[0],
            StructureIssue::ParameterMissing(Parameter::Temperature)
        );
    }

    #[test]
    fn test_summary_of_empty_dataset() {
        let summary = ValidationSummary::new(&Dataset::default(), 108);
        assert_eq!(summary.total_points, 0);
        assert_eq!(summary.percent_ok(), 0.0);
        assert!(summary.to_string().contains("Failed pages: 108"));
    }

    #[test]
    fn test_issue_display() {
        let issue = StructureIssue::SeriesLength {
            parameter: Parameter::Density,
            location: Location::new(50, 60),
            season: Season::Spring,
            len: 8,
        };
        assert_eq!(issue.to_string(), "density (50,60) spring: 8 values, expected 9");
    }
}
