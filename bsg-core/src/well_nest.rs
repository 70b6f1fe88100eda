use crate::error::{Result, SubsidenceError};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Well nests analysed in the published figures.
pub const PAPER_WELL_NESTS: [&str; 23] = [
    "LCBKK003", "LCBKK005", "LCBKK006", "LCBKK007", "LCBKK009", "LCBKK011", "LCBKK012",
    "LCBKK013", "LCBKK014", "LCBKK015", "LCBKK016", "LCBKK018", "LCBKK020", "LCBKK021",
    "LCBKK026", "LCBKK027", "LCBKK036", "LCBKK038", "LCBKK041", "LCNBI003", "LCNBI007",
    "LCSPK007", "LCSPK009",
];

/// Maximum number of wells (one per aquifer) in a well nest.
pub const MAX_WELLS_PER_NEST: usize = 4;

/// Geographic location of a well nest, as exported from the well
/// location sheet (`WellNest_Name,Long,Lat`).
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct WellNestLocation {
    #[serde(rename = "WellNest_Name")]
    pub name: String,
    /// Longitude in decimal degrees
    #[serde(rename = "Long")]
    pub longitude: f64,
    /// Latitude in decimal degrees
    #[serde(rename = "Lat")]
    pub latitude: f64,
}

impl WellNestLocation {
    /// Parse the well location CSV. Extra columns are ignored; a well nest
    /// listed several times (once per well) keeps its first row.
    pub fn parse_location_csv(csv_object: &str) -> Result<Vec<WellNestLocation>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        let mut seen: HashSet<String> = HashSet::new();
        let mut locations = Vec::new();
        for row in rdr.deserialize() {
            let location: WellNestLocation = row?;
            if seen.insert(location.name.clone()) {
                locations.push(location);
            }
        }
        Ok(locations)
    }

    /// Label drawn next to the location marker: the name without the
    /// two-letter `LC` prefix.
    pub fn short_label(&self) -> &str {
        self.name.get(2..).unwrap_or(&self.name)
    }
}

/// Keep the first well nest at each exact coordinate pair, restricted to
/// `wanted` names.
pub fn unique_locations<'a>(
    locations: &'a [WellNestLocation],
    wanted: &[&str],
) -> Vec<&'a WellNestLocation> {
    let mut seen: Vec<(f64, f64)> = Vec::new();
    let mut result = Vec::new();
    for location in locations {
        let key = (location.longitude, location.latitude);
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        if wanted.contains(&location.name.as_str()) {
            result.push(location);
        }
    }
    result
}

/// Name-keyed lookup over the location table.
#[derive(Debug, Clone, Default)]
pub struct LocationIndex(HashMap<String, WellNestLocation>);

impl LocationIndex {
    pub fn get(&self, well_nest: &str) -> Result<&WellNestLocation> {
        self.0
            .get(well_nest)
            .ok_or_else(|| SubsidenceError::WellNestNotFound(well_nest.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<WellNestLocation>> for LocationIndex {
    fn from(value: Vec<WellNestLocation>) -> Self {
        LocationIndex(
            value
                .into_iter()
                .map(|location| (location.name.clone(), location))
                .collect(),
        )
    }
}

/// The aquifer a monitoring well screens, encoded in the well name.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WellKind {
    /// Bangkok aquifer
    Bk,
    /// Phra Pradaeng aquifer
    Pd,
    /// Nakhon Luang aquifer
    Nl,
    /// Nonthaburi aquifer
    Nb,
}

impl WellKind {
    /// Canonical panel and wedge order.
    pub const ALL: [WellKind; 4] = [WellKind::Bk, WellKind::Pd, WellKind::Nl, WellKind::Nb];

    pub fn code(&self) -> &'static str {
        match self {
            WellKind::Bk => "BK",
            WellKind::Pd => "PD",
            WellKind::Nl => "NL",
            WellKind::Nb => "NB",
        }
    }

    /// Classify a well by the aquifer code embedded in its name. A
    /// separator-delimited token equal to a code wins over a plain
    /// substring, so `LCBKK003_NB` is a Nonthaburi well.
    pub fn from_well_name(well_name: &str) -> Result<WellKind> {
        let tokens: Vec<&str> = well_name.split(['_', '-', ' ']).collect();
        WellKind::ALL
            .into_iter()
            .find(|kind| tokens.contains(&kind.code()))
            .or_else(|| {
                WellKind::ALL
                    .into_iter()
                    .find(|kind| well_name.contains(kind.code()))
            })
            .ok_or_else(|| SubsidenceError::UnknownWellKind(well_name.to_string()))
    }
}

impl fmt::Display for WellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A well nest and the wells it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct WellNest {
    pub location: WellNestLocation,
    pub wells: Vec<String>,
}

impl WellNest {
    pub fn new(location: WellNestLocation, wells: Vec<String>) -> Result<WellNest> {
        if wells.is_empty() || wells.len() > MAX_WELLS_PER_NEST {
            return Err(SubsidenceError::WellCount {
                well_nest: location.name,
                found: wells.len(),
            });
        }
        for well in &wells {
            WellKind::from_well_name(well)?;
        }
        Ok(WellNest { location, wells })
    }

    pub fn name(&self) -> &str {
        &self.location.name
    }

    /// Wells sorted into BK, PD, NL, NB order.
    pub fn wells_in_panel_order(&self) -> Vec<(WellKind, &str)> {
        let mut ordered: Vec<(WellKind, &str)> = self
            .wells
            .iter()
            .filter_map(|well| {
                WellKind::from_well_name(well)
                    .ok()
                    .map(|kind| (kind, well.as_str()))
            })
            .collect();
        ordered.sort_by_key(|(kind, _)| *kind);
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATIONS_CSV: &str = "WellNest_Name,Well_Name,Long,Lat
LCBKK003,BK_LCBKK003,100.55,13.71
LCBKK003,PD_LCBKK003,100.55,13.71
LCBKK005,BK_LCBKK005,100.60,13.80
LCNBI099,NB_LCNBI099,100.60,13.80
LCSPK007,PD_LCSPK007,100.62,13.60
";

    #[test]
    fn test_parse_location_csv_keeps_first_row_per_name() {
        let locations = WellNestLocation::parse_location_csv(LOCATIONS_CSV).unwrap();
        assert_eq!(locations.len(), 4);
        assert_eq!(locations[0].name, "LCBKK003");
        assert_eq!(locations[0].longitude, 100.55);
        assert_eq!(locations[0].short_label(), "BKK003");
    }

    #[test]
    fn test_unique_locations_filters_shared_coordinates() {
        let locations = WellNestLocation::parse_location_csv(LOCATIONS_CSV).unwrap();
        let wanted = ["LCBKK003", "LCNBI099", "LCSPK007"];
        let unique = unique_locations(&locations, &wanted);
        // LCNBI099 shares LCBKK005's coordinates, which came first
        let names: Vec<&str> = unique.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["LCBKK003", "LCSPK007"]);
    }

    #[test]
    fn test_location_index_missing_name() {
        let index: LocationIndex = WellNestLocation::parse_location_csv(LOCATIONS_CSV)
            .unwrap()
            .into();
        assert!(index.get("LCBKK005").is_ok());
        assert!(matches!(
            index.get("LCBKK999"),
            Err(SubsidenceError::WellNestNotFound(_))
        ));
    }

    #[test]
    fn test_well_kind_from_name() {
        assert_eq!(WellKind::from_well_name("PD_LCBKK003").unwrap(), WellKind::Pd);
        assert_eq!(WellKind::from_well_name("LCNBI003_NB").unwrap(), WellKind::Nb);
        assert_eq!(WellKind::from_well_name("LCBKK003_NB").unwrap(), WellKind::Nb);
        assert_eq!(WellKind::from_well_name("BK13").unwrap(), WellKind::Bk);
        assert!(WellKind::from_well_name("LCSPK003_XX").is_err());
    }

    #[test]
    fn test_well_nest_orders_and_limits_wells() {
        let location = WellNestLocation {
            name: "LCBKK013".to_string(),
            longitude: 100.5,
            latitude: 13.7,
        };
        let wells = vec!["NB_13", "BK_13", "NL_13", "PD_13"]
            .into_iter()
            .map(String::from)
            .collect();
        let nest = WellNest::new(location.clone(), wells).unwrap();
        let order: Vec<WellKind> = nest.wells_in_panel_order().iter().map(|w| w.0).collect();
        assert_eq!(order, WellKind::ALL.to_vec());

        let too_many = vec!["BK_1", "PD_1", "NL_1", "NB_1", "BK_2"]
            .into_iter()
            .map(String::from)
            .collect();
        assert!(matches!(
            WellNest::new(location, too_many),
            Err(SubsidenceError::WellCount { found: 5, .. })
        ));
    }
}
