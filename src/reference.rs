/// Fixed reference tables of GOST R 54084-2010
///
/// Heights, seasons, parameters and the longitude-group location grids are
/// process-wide constants. Nothing here is mutated after startup.
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Height levels used in all tables (meters above ground)
pub const HEIGHTS: [u32; 9] = [10, 100, 300, 600, 1000, 1500, 2000, 2500, 3000];

/// Lowest height level; a row at this height opens a new seasonal block
pub const BOUNDARY_HEIGHT: u32 = HEIGHTS[0];

/// Known OCR misreadings of height markers, mapped to the real level
///
/// - "1000" is sometimes read as "1200"
/// - "3000" is sometimes read as "5000"
pub const HEIGHT_ALIASES: [(u32, u32); 2] = [(1200, 1000), (5000, 3000)];

/// Rows per seasonal block (one per height level)
pub const ROWS_PER_SEASON: usize = HEIGHTS.len();

/// Expected data rows on a complete page (5 seasons × 9 heights)
pub const ROWS_PER_PAGE: usize = ROWS_PER_SEASON * Season::ALL.len();

/// Map an OCR-garbled height to its canonical level; other values pass through
pub fn canonical_height(height: u32) -> u32 {
    HEIGHT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == height)
        .map(|(_, real)| *real)
        .unwrap_or(height)
}

/// True for a height level or one of its known aliases
pub fn is_recognized_height(height: u32) -> bool {
    HEIGHTS.contains(&height) || HEIGHT_ALIASES.iter().any(|(alias, _)| *alias == height)
}

/// Seasonal block labels, in the order they appear on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// December, January, February
    Winter,
    /// March, April, May
    Spring,
    /// June, July, August
    Summer,
    /// September, October, November
    Autumn,
    /// Yearly mean
    Annual,
}

impl Season {
    pub const ALL: [Season; 5] = [
        Season::Winter,
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Annual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Annual => "annual",
        }
    }

    /// Season for the n-th block of a page
    pub fn from_block_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical quantity tabulated by a group of twelve pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Temperature,
    Pressure,
    Density,
    ScalarWindSpeed,
    ZonalWindSpeed,
    MeridionalWindSpeed,
    ResultantWind,
    SpecificHumidity,
    RelativeHumidityDewpoint,
}

impl Parameter {
    pub const ALL: [Parameter; 9] = [
        Parameter::Temperature,
        Parameter::Pressure,
        Parameter::Density,
        Parameter::ScalarWindSpeed,
        Parameter::ZonalWindSpeed,
        Parameter::MeridionalWindSpeed,
        Parameter::ResultantWind,
        Parameter::SpecificHumidity,
        Parameter::RelativeHumidityDewpoint,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::Pressure => "pressure",
            Parameter::Density => "density",
            Parameter::ScalarWindSpeed => "scalar_wind_speed",
            Parameter::ZonalWindSpeed => "zonal_wind_speed",
            Parameter::MeridionalWindSpeed => "meridional_wind_speed",
            Parameter::ResultantWind => "resultant_wind",
            Parameter::SpecificHumidity => "specific_humidity",
            Parameter::RelativeHumidityDewpoint => "relative_humidity_dewpoint",
        }
    }

    /// Units of the (primary, secondary) slots of a value pair
    pub fn units(&self) -> (&'static str, &'static str) {
        match self {
            Parameter::Temperature => ("K", "K"),
            Parameter::Pressure => ("hPa", "%"),
            Parameter::Density => ("kg/m3", "kg/m3"),
            Parameter::ScalarWindSpeed
            | Parameter::ZonalWindSpeed
            | Parameter::MeridionalWindSpeed => ("m/s", "m/s"),
            Parameter::ResultantWind => ("m/s", "deg"),
            Parameter::SpecificHumidity => ("g/kg", "g/kg"),
            Parameter::RelativeHumidityDewpoint => ("%", "degC"),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Parameter::Temperature => "Temperature T and std σT",
            Parameter::Pressure => "Pressure P and std σP",
            Parameter::Density => "Density ρ and std σρ",
            Parameter::ScalarWindSpeed => "Scalar wind speed Vs and std σv",
            Parameter::ZonalWindSpeed => "Zonal wind speed Vx and std σvx",
            Parameter::MeridionalWindSpeed => "Meridional wind speed Vy and std σvy",
            Parameter::ResultantWind => "Resultant wind VR (m/s) and direction θR (°)",
            Parameter::SpecificHumidity => "Specific humidity q and std σq",
            Parameter::RelativeHumidityDewpoint => "Relative humidity Q% and dew point Dp",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Geographic grid point (latitude N, longitude E; negative longitude = West)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub lat: i16,
    pub lon: i16,
}

impl Location {
    pub const fn new(lat: i16, lon: i16) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Serialized as `"lat,lon"` so it can key a JSON object
impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One of the twelve column layouts of a data page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongitudeGroup {
    pub index: usize,
    pub label: &'static str,
    pub locations: &'static [Location],
}

impl LongitudeGroup {
    pub fn from_index(index: usize) -> Option<&'static LongitudeGroup> {
        LONGITUDE_GROUPS.get(index)
    }

    pub fn by_label(label: &str) -> Option<&'static LongitudeGroup> {
        LONGITUDE_GROUPS.iter().find(|g| g.label == label)
    }

    /// Columns (locations) on a page of this group
    pub fn column_count(&self) -> usize {
        self.locations.len()
    }

    /// Numeric values per data row (two per location)
    pub fn values_per_row(&self) -> usize {
        self.locations.len() * 2
    }
}

const fn loc(lat: i16, lon: i16) -> Location {
    Location::new(lat, lon)
}

pub static LONGITUDE_GROUPS: [LongitudeGroup; 12] = [
    LongitudeGroup {
        index: 0,
        label: "20E+30E",
        locations: &[
            loc(55, 20),
            loc(45, 30),
            loc(50, 30),
            loc(55, 30),
            loc(60, 30),
            loc(65, 30),
            loc(70, 30),
        ],
    },
    LongitudeGroup {
        index: 1,
        label: "40E",
        locations: &[
            loc(45, 40),
            loc(50, 40),
            loc(55, 40),
            loc(60, 40),
            loc(65, 40),
            loc(70, 40),
        ],
    },
    LongitudeGroup {
        index: 2,
        label: "50E",
        locations: &[
            loc(40, 50),
            loc(45, 50),
            loc(50, 50),
            loc(55, 50),
            loc(60, 50),
            loc(65, 50),
            loc(70, 50),
        ],
    },
    LongitudeGroup {
        index: 3,
        label: "60E",
        locations: &[
            loc(40, 60),
            loc(45, 60),
            loc(50, 60),
            loc(55, 60),
            loc(60, 60),
            loc(65, 60),
            loc(70, 60),
        ],
    },
    LongitudeGroup {
        index: 4,
        label: "70E",
        locations: &[
            loc(40, 70),
            loc(45, 70),
            loc(50, 70),
            loc(55, 70),
            loc(60, 70),
            loc(65, 70),
            loc(70, 70),
        ],
    },
    LongitudeGroup {
        index: 5,
        label: "80E",
        locations: &[
            loc(45, 80),
            loc(50, 80),
            loc(55, 80),
            loc(60, 80),
            loc(65, 80),
            loc(70, 80),
            loc(75, 80),
        ],
    },
    LongitudeGroup {
        index: 6,
        label: "90E",
        locations: &[
            loc(50, 90),
            loc(55, 90),
            loc(60, 90),
            loc(65, 90),
            loc(70, 90),
            loc(75, 90),
        ],
    },
    LongitudeGroup {
        index: 7,
        label: "105E",
        locations: &[
            loc(50, 105),
            loc(55, 105),
            loc(60, 105),
            loc(65, 105),
            loc(70, 105),
            loc(75, 105),
        ],
    },
    LongitudeGroup {
        index: 8,
        label: "120E",
        locations: &[
            loc(50, 120),
            loc(55, 120),
            loc(60, 120),
            loc(65, 120),
            loc(70, 120),
        ],
    },
    LongitudeGroup {
        index: 9,
        label: "135E",
        locations: &[
            loc(45, 135),
            loc(50, 135),
            loc(55, 135),
            loc(60, 135),
            loc(65, 135),
            loc(70, 135),
        ],
    },
    LongitudeGroup {
        index: 10,
        label: "155E",
        locations: &[
            loc(50, 155),
            loc(55, 155),
            loc(60, 155),
            loc(65, 155),
            loc(70, 155),
        ],
    },
    LongitudeGroup {
        index: 11,
        label: "175E+170W",
        locations: &[loc(60, 175), loc(65, 175), loc(70, 175), loc(65, -170)],
    },
];

/// The 73-point union of every longitude group's grid
pub fn all_locations() -> BTreeSet<Location> {
    LONGITUDE_GROUPS
        .iter()
        .flat_map(|g| g.locations.iter().copied())
        .collect()
}

/// (parameter, longitude group) addressed by a data page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCoordinate {
    pub page_num: u32,
    pub table_number: usize,
    pub parameter: Parameter,
    pub group: &'static LongitudeGroup,
}

/// Mapping from page numbers to table coordinates
///
/// Tables are laid out parameter-major, longitude-group-minor, one per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub first_page: u32,
    pub last_page: u32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            first_page: 9,
            last_page: 116,
        }
    }
}

impl PageLayout {
    pub fn new(first_page: u32, last_page: u32) -> Self {
        Self {
            first_page,
            last_page,
        }
    }

    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.first_page..=self.last_page
    }

    pub fn page_count(&self) -> usize {
        self.pages().count()
    }

    /// Coordinate for a page, or None outside the layout / table grid
    pub fn coordinate(&self, page_num: u32) -> Option<PageCoordinate> {
        if !self.pages().contains(&page_num) {
            return None;
        }
        let table_index = (page_num - self.first_page) as usize;
        let groups = LONGITUDE_GROUPS.len();
        let parameter = Parameter::from_index(table_index / groups)?;
        let group = LongitudeGroup::from_index(table_index % groups)?;

        Some(PageCoordinate {
            page_num,
            table_number: table_index + 1,
            parameter,
            group,
        })
    }
}
