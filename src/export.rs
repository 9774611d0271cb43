/// JSON export of the assembled dataset
///
/// Plain structured data: heights, seasons, the location-grid reference and
/// one object per parameter. No parsing internals leak into the output.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::dataset::{Dataset, LocationTable};
use crate::reference::{Location, Parameter, Season, HEIGHTS, LONGITUDE_GROUPS};

pub const STANDARD_TITLE: &str = "GOST R 54084-2010: Models of the atmosphere in the boundary layer \
at altitudes from 0 to 3000 m for aerospace practice. Parameters.";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One longitude group of the reference mapping
#[derive(Debug, Clone, Serialize)]
pub struct LocationGridExport {
    pub label: &'static str,
    pub locations: Vec<[i16; 2]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterExport<'a> {
    pub primary_unit: &'static str,
    pub secondary_unit: &'static str,
    pub description: &'static str,
    pub locations: &'a LocationTable,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetExport<'a> {
    pub standard: &'static str,
    pub generated_at: DateTime<Utc>,
    pub heights: [u32; 9],
    pub seasons: [Season; 5],
    pub location_grids: Vec<LocationGridExport>,
    pub parameters: BTreeMap<Parameter, ParameterExport<'a>>,
}

/// Reference mapping of longitude groups to their locations, in group order
pub fn location_grids() -> Vec<LocationGridExport> {
    LONGITUDE_GROUPS
        .iter()
        .map(|group| LocationGridExport {
            label: group.label,
            locations: group
                .locations
                .iter()
                .map(|&Location { lat, lon }| [lat, lon])
                .collect(),
        })
        .collect()
}

impl<'a> DatasetExport<'a> {
    /// Every parameter is present; parameters without parsed pages get an empty map
    pub fn new(dataset: &'a Dataset, empty: &'a LocationTable) -> Self {
        let parameters = Parameter::ALL
            .iter()
            .map(|&parameter| {
                let (primary_unit, secondary_unit) = parameter.units();
                (
                    parameter,
                    ParameterExport {
                        primary_unit,
                        secondary_unit,
                        description: parameter.description(),
                        locations: dataset.parameter(parameter).unwrap_or(empty),
                    },
                )
            })
            .collect();

        Self {
            standard: STANDARD_TITLE,
            generated_at: Utc::now(),
            heights: HEIGHTS,
            seasons: Season::ALL,
            location_grids: location_grids(),
            parameters,
        }
    }
}

/// Serialize the dataset as pretty-printed JSON
pub fn to_json(dataset: &Dataset) -> Result<String, ExportError> {
    let empty = LocationTable::new();
    let export = DatasetExport::new(dataset, &empty);
    Ok(serde_json::to_string_pretty(&export)?)
}

/// The location-grid reference mapping on its own
pub fn location_grids_json() -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&location_grids())?)
}

/// Write the JSON export to `path`, creating parent directories
pub fn write_json(dataset: &Dataset, path: &Path) -> Result<(), ExportError> {
    let json = to_json(dataset)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Output written to: {}", path.display());
    Ok(())
}
