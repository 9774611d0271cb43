/// Assembled GOST R 54084-2010 dataset
///
/// parameter -> location -> season -> nine value pairs (10 m ... 3000 m).
/// Built once by the [`crate::assembler::TableAssembler`] and read-only afterwards.
use serde::Serialize;
use std::collections::BTreeMap;

use crate::reference::{Location, Parameter, Season};

/// (primary, secondary) value; `None` is an unrecoverable gap, never zero
pub type ValuePair = (Option<f64>, Option<f64>);

/// Seasonal profiles of one location
pub type SeasonSeries = BTreeMap<Season, Vec<ValuePair>>;

/// All locations of one parameter
pub type LocationTable = BTreeMap<Location, SeasonSeries>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    parameters: BTreeMap<Parameter, LocationTable>,
}

impl Dataset {
    pub(crate) fn from_parameters(parameters: BTreeMap<Parameter, LocationTable>) -> Self {
        Self { parameters }
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Parameters that received at least one page
    pub fn parameters(&self) -> impl Iterator<Item = (Parameter, &LocationTable)> {
        self.parameters.iter().map(|(p, table)| (*p, table))
    }

    pub fn parameter(&self, parameter: Parameter) -> Option<&LocationTable> {
        self.parameters.get(&parameter)
    }

    pub fn location(&self, parameter: Parameter, location: Location) -> Option<&SeasonSeries> {
        self.parameter(parameter)?.get(&location)
    }

    /// Profile of one (parameter, location, season), ordered by height
    pub fn series(
        &self,
        parameter: Parameter,
        location: Location,
        season: Season,
    ) -> Option<&[ValuePair]> {
        self.location(parameter, location)?
            .get(&season)
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let loc = Location::new(55, 30);
        let mut series = SeasonSeries::new();
        series.insert(
            Season::Winter,
            vec![(Some(268.1), Some(6.2)), (None, None), (Some(266.0), None)],
        );
        let mut table = LocationTable::new();
        table.insert(loc, series);
        let mut parameters = BTreeMap::new();
        parameters.insert(Parameter::Temperature, table);
        Dataset::from_parameters(parameters)
    }

    #[test]
    fn test_series_lookup() {
        let ds = sample();
        let s = ds
            .series(Parameter::Temperature, Location::new(55, 30), Season::Winter)
            .unwrap();
        assert_eq!(s[0], (Some(268.1), Some(6.2)));
        assert!(ds
            .series(Parameter::Temperature, Location::new(55, 30), Season::Annual)
            .is_none());
        assert!(ds
            .series(Parameter::Pressure, Location::new(55, 30), Season::Winter)
            .is_none());
    }

    #[test]
    fn test_serializes_nested_maps() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json["temperature"]["55,30"]["winter"][1],
            serde_json::json!([null, null])
        );
        assert_eq!(
            json["temperature"]["55,30"]["winter"][0],
            serde_json::json!([268.1, 6.2])
        );
    }
}
